//! In-process storage for the menu, cart and order tables.
//!
//! All mutations go through a [`Transaction`]. Writes are staged in the
//! transaction and only become visible on [`Transaction::commit`]; dropping a
//! transaction without committing discards them. Because `begin` borrows the
//! [`Database`] mutably, at most one transaction is open at a time, which gives
//! every transaction a serializable view of the tables.
//!
//! Id sequences (menu items, cart lines and, in [`OrderNumbering::Sequence`]
//! mode, order numbers) are advanced outside the staged write set, the same
//! way database sequences ignore rollbacks. With a snapshot file the order
//! sequence is written out as soon as it advances, so a restart cannot hand out
//! a number again.

mod cart;
mod inventory;
mod ledger;

pub use cart::CartStore;
pub use inventory::InventoryStore;
pub use ledger::OrderLedger;

use std::collections::BTreeMap;
use std::mem;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::{CartLine, CartLineId, FoodId, MenuItem, OrderNo, OrderSummary, UserId};
use crate::error::StorageError;

/// How order numbers are allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderNumbering {
    /// `max(existing) + 1`. Gapless; a number taken by an aborted transaction
    /// goes to the next committed order.
    #[default]
    Dense,
    /// `max(existing, last issued) + 1`. Numbers are never handed out twice,
    /// even when the allocating transaction aborts.
    Sequence,
}

impl FromStr for OrderNumbering {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dense" => Ok(OrderNumbering::Dense),
            "sequence" => Ok(OrderNumbering::Sequence),
            other => Err(format!("unknown order numbering: {other}")),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    pub numbering: OrderNumbering,
    /// JSON snapshot file. `None` keeps everything in memory.
    pub data_file: Option<PathBuf>,
}

/// Last value handed out by each id sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sequences {
    pub food_id: FoodId,
    pub cart_line_id: CartLineId,
    pub order_no: OrderNo,
}

/// Committed contents of the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tables {
    pub menu: BTreeMap<FoodId, MenuItem>,
    pub carts: BTreeMap<UserId, Vec<CartLine>>,
    pub orders: BTreeMap<OrderNo, OrderSummary>,
    pub sequences: Sequences,
}

pub struct Database {
    tables: Tables,
    numbering: OrderNumbering,
    data_file: Option<PathBuf>,
}

impl Database {
    pub fn in_memory(numbering: OrderNumbering) -> Self {
        Self {
            tables: Tables::default(),
            numbering,
            data_file: None,
        }
    }

    /// Opens the store, loading the snapshot file when one is configured and present.
    pub fn open(config: &StoreConfig) -> Result<Self, StorageError> {
        let tables = match &config.data_file {
            Some(path) if path.exists() => {
                let tables = load(path)?;
                info!(
                    path = %path.display(),
                    menu_items = tables.menu.len(),
                    orders = tables.orders.len(),
                    "Loaded store snapshot"
                );
                tables
            }
            _ => Tables::default(),
        };

        Ok(Self {
            tables,
            numbering: config.numbering,
            data_file: config.data_file.clone(),
        })
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    pub fn numbering(&self) -> OrderNumbering {
        self.numbering
    }

    pub fn begin(&mut self) -> Transaction<'_> {
        Transaction {
            db: self,
            writes: WriteSet::default(),
            finished: false,
        }
    }
}

/// Rows touched by an open transaction.
#[derive(Debug, Default)]
struct WriteSet {
    /// `None` marks a deleted menu item.
    menu: BTreeMap<FoodId, Option<MenuItem>>,
    /// Full replacement of a user's cart; empty means cleared.
    carts: BTreeMap<UserId, Vec<CartLine>>,
    orders: BTreeMap<OrderNo, OrderSummary>,
}

impl WriteSet {
    fn is_empty(&self) -> bool {
        self.menu.is_empty() && self.carts.is_empty() && self.orders.is_empty()
    }

    fn apply(self, tables: &mut Tables) {
        for (id, item) in self.menu {
            match item {
                Some(item) => {
                    tables.menu.insert(id, item);
                }
                None => {
                    tables.menu.remove(&id);
                }
            }
        }
        for (user_id, lines) in self.carts {
            if lines.is_empty() {
                tables.carts.remove(&user_id);
            } else {
                tables.carts.insert(user_id, lines);
            }
        }
        tables.orders.extend(self.orders);
    }
}

/// Unit of work over the store tables.
pub struct Transaction<'db> {
    db: &'db mut Database,
    writes: WriteSet,
    finished: bool,
}

impl Transaction<'_> {
    pub fn has_writes(&self) -> bool {
        !self.writes.is_empty()
    }

    /// Makes every staged write visible. When a snapshot file is configured the
    /// post-commit state is written first; if that fails nothing is applied.
    pub fn commit(mut self) -> Result<(), StorageError> {
        self.finished = true;
        let writes = mem::take(&mut self.writes);
        if writes.is_empty() {
            return Ok(());
        }

        match self.db.data_file.clone() {
            None => writes.apply(&mut self.db.tables),
            Some(path) => {
                let mut next = self.db.tables.clone();
                writes.apply(&mut next);
                persist(&path, &next)?;
                self.db.tables = next;
            }
        }
        debug!("Transaction committed");
        Ok(())
    }

    pub fn rollback(mut self) {
        self.finished = true;
        if self.has_writes() {
            debug!("Transaction rolled back");
        }
    }

    fn menu_item(&self, id: FoodId) -> Option<&MenuItem> {
        match self.writes.menu.get(&id) {
            Some(staged) => staged.as_ref(),
            None => self.db.tables.menu.get(&id),
        }
    }

    fn menu_items(&self) -> Vec<MenuItem> {
        let mut merged = self.db.tables.menu.clone();
        for (id, staged) in &self.writes.menu {
            match staged {
                Some(item) => {
                    merged.insert(*id, item.clone());
                }
                None => {
                    merged.remove(id);
                }
            }
        }
        merged.into_values().collect()
    }

    fn put_menu_item(&mut self, item: MenuItem) {
        self.writes.menu.insert(item.id, Some(item));
    }

    fn remove_menu_item(&mut self, id: FoodId) {
        self.writes.menu.insert(id, None);
    }

    fn cart(&self, user_id: UserId) -> &[CartLine] {
        self.writes
            .carts
            .get(&user_id)
            .or_else(|| self.db.tables.carts.get(&user_id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn set_cart(&mut self, user_id: UserId, lines: Vec<CartLine>) {
        self.writes.carts.insert(user_id, lines);
    }

    fn order(&self, order_no: OrderNo) -> Option<&OrderSummary> {
        self.writes
            .orders
            .get(&order_no)
            .or_else(|| self.db.tables.orders.get(&order_no))
    }

    /// Committed and staged orders, ascending by order number.
    fn all_orders(&self) -> impl Iterator<Item = &OrderSummary> {
        let mut merged: Vec<&OrderSummary> = self
            .db
            .tables
            .orders
            .values()
            .chain(self.writes.orders.values())
            .collect();
        merged.sort_by_key(|summary| summary.order.order_no);
        merged.into_iter()
    }

    fn max_order_no(&self) -> OrderNo {
        let committed = self.db.tables.orders.keys().next_back().copied();
        let staged = self.writes.orders.keys().next_back().copied();
        committed.max(staged).unwrap_or(0)
    }

    fn stage_order(&mut self, summary: OrderSummary) {
        self.writes.orders.insert(summary.order.order_no, summary);
    }

    fn sequences(&mut self) -> &mut Sequences {
        &mut self.db.tables.sequences
    }

    fn numbering(&self) -> OrderNumbering {
        self.db.numbering
    }

    /// Writes the committed tables, including sequences advanced by this
    /// transaction, without applying its staged writes.
    fn persist_sequences(&self) -> Result<(), StorageError> {
        match &self.db.data_file {
            Some(path) => persist(path, &self.db.tables),
            None => Ok(()),
        }
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.finished && self.has_writes() {
            warn!("Transaction dropped without commit, discarding staged writes");
        }
    }
}

fn load(path: &Path) -> Result<Tables, StorageError> {
    let body = std::fs::read(path)
        .map_err(|e| StorageError::new(format!("failed to read {}: {e}", path.display())))?;
    serde_json::from_slice(&body)
        .map_err(|e| StorageError::new(format!("failed to decode {}: {e}", path.display())))
}

fn persist(path: &Path, tables: &Tables) -> Result<(), StorageError> {
    let body = serde_json::to_vec_pretty(tables)
        .map_err(|e| StorageError::new(format!("failed to encode snapshot: {e}")))?;
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, body)
        .map_err(|e| StorageError::new(format!("failed to write {}: {e}", tmp.display())))?;
    std::fs::rename(&tmp, path)
        .map_err(|e| StorageError::new(format!("failed to replace {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MenuItemCreate;
    use rust_decimal::Decimal;

    fn seed_item(db: &mut Database, name: &str, quantity: u32) -> FoodId {
        let mut tx = db.begin();
        let item = tx
            .create_item(MenuItemCreate::new(name, Decimal::new(500, 2), quantity))
            .unwrap();
        tx.commit().unwrap();
        item.id
    }

    #[test]
    fn committed_writes_are_visible() {
        let mut db = Database::in_memory(OrderNumbering::Dense);
        let id = seed_item(&mut db, "Dumplings", 4);

        assert_eq!(db.tables().menu[&id].quantity, 4);
    }

    #[test]
    fn dropped_transaction_discards_writes() {
        let mut db = Database::in_memory(OrderNumbering::Dense);
        let id = seed_item(&mut db, "Dumplings", 4);

        {
            let mut tx = db.begin();
            tx.decrement_stock(id, 3).unwrap();
            tx.add_line(1, id, 1).unwrap();
            assert!(tx.has_writes());
        }

        assert_eq!(db.tables().menu[&id].quantity, 4);
        assert!(db.tables().carts.is_empty());
    }

    #[test]
    fn transaction_reads_its_own_writes() {
        let mut db = Database::in_memory(OrderNumbering::Dense);
        let id = seed_item(&mut db, "Dumplings", 4);

        let mut tx = db.begin();
        tx.decrement_stock(id, 3).unwrap();
        assert_eq!(tx.get_item(id).map(|item| item.quantity), Some(1));
        tx.rollback();
    }

    #[test]
    fn numbering_parses_case_insensitively() {
        assert_eq!("Sequence".parse::<OrderNumbering>(), Ok(OrderNumbering::Sequence));
        assert_eq!(" dense ".parse::<OrderNumbering>(), Ok(OrderNumbering::Dense));
        assert!("random".parse::<OrderNumbering>().is_err());
    }

    #[test]
    fn snapshot_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            numbering: OrderNumbering::Dense,
            data_file: Some(dir.path().join("store.json")),
        };

        let mut db = Database::open(&config).unwrap();
        let id = seed_item(&mut db, "Laksa", 6);
        drop(db);

        let reopened = Database::open(&config).unwrap();
        assert_eq!(reopened.tables().menu[&id].name, "Laksa");
        assert_eq!(reopened.tables().sequences.food_id, id);
    }

    #[test]
    fn failed_persist_leaves_state_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            numbering: OrderNumbering::Dense,
            data_file: Some(dir.path().join("missing").join("store.json")),
        };
        let mut db = Database::open(&config).unwrap();

        let mut tx = db.begin();
        tx.create_item(MenuItemCreate::new("Laksa", Decimal::new(900, 2), 6))
            .unwrap();
        let result = tx.commit();

        assert!(result.is_err());
        assert!(db.tables().menu.is_empty());
    }
}
