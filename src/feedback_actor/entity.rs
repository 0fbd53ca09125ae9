use chrono::Utc;

use crate::actor_framework::Entity;
use crate::domain::{Feedback, FeedbackCreate, FeedbackId};

const RATING_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

impl Entity for Feedback {
    const KIND: &'static str = "Feedback";

    type Id = FeedbackId;
    type CreateParams = FeedbackCreate;
    type Patch = ();
    type Action = ();
    type ActionResult = ();

    fn id(&self) -> &FeedbackId {
        &self.id
    }

    fn from_create_params(id: FeedbackId, params: FeedbackCreate) -> Result<Self, String> {
        if params.message.trim().is_empty() {
            return Err("feedback message must not be empty".to_string());
        }
        if !RATING_RANGE.contains(&params.rating) {
            return Err(format!("rating must be between 1 and 5, got {}", params.rating));
        }

        Ok(Self {
            id,
            user_id: params.user_id,
            name: params.name,
            message: params.message,
            rating: params.rating,
            created_at: Utc::now(),
        })
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), String> {
        Err("feedback is append-only".to_string())
    }

    fn on_delete(&self) -> Result<(), String> {
        Err("feedback is append-only".to_string())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}
