use super::{invalid_on_constraint, require_row};
use crate::db::Database;
use crate::error::{AgroError, Result};
use crate::models::{InventoryItem, Warehouse};
use rusqlite::{params, Connection, OptionalExtension, Row};

pub(crate) fn insert_warehouse(conn: &Connection, warehouse: &Warehouse) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO warehouses (name) VALUES (?1)",
        params![warehouse.name],
    )?;
    Ok(conn.last_insert_rowid())
}

pub(crate) fn insert_inventory_item(
    conn: &Connection,
    item: &InventoryItem,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO inventory_items (warehouse_id, name, quantity, unit) VALUES (?1, ?2, ?3, ?4)",
        params![item.warehouse_id, item.name, item.quantity, item.unit],
    )?;
    Ok(conn.last_insert_rowid())
}

// Warehouse Queries

impl Database {
    pub fn create_warehouse(&self, warehouse: &Warehouse) -> Result<i64> {
        self.with_conn(|conn| Ok(insert_warehouse(conn, warehouse)?))
    }

    pub fn get_warehouse(&self, id: i64) -> Result<Option<Warehouse>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT * FROM warehouses WHERE id = ?1",
                [id],
                row_to_warehouse,
            )
            .optional()
            .map_err(Into::into)
        })
    }

    pub fn list_warehouses(&self) -> Result<Vec<Warehouse>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM warehouses ORDER BY id")?;
            let warehouses = stmt
                .query_map([], row_to_warehouse)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(warehouses)
        })
    }

    pub fn update_warehouse(&self, warehouse: &Warehouse) -> Result<()> {
        let id = warehouse
            .id
            .ok_or_else(|| AgroError::InvalidData("Warehouse has no ID".into()))?;

        self.with_conn(|conn| {
            let affected = conn.execute(
                "UPDATE warehouses SET name = ?1 WHERE id = ?2",
                params![warehouse.name, id],
            )?;
            require_row(affected, "Warehouse", id)
        })
    }

    /// Inventory stored in the warehouse goes with it.
    pub fn delete_warehouse(&self, id: i64) -> Result<()> {
        self.with_conn(|conn| {
            let affected = conn.execute("DELETE FROM warehouses WHERE id = ?1", [id])?;
            require_row(affected, "Warehouse", id)
        })
    }
}

fn row_to_warehouse(row: &Row) -> rusqlite::Result<Warehouse> {
    Ok(Warehouse {
        id: Some(row.get("id")?),
        name: row.get("name")?,
    })
}

// Inventory Item Queries

impl Database {
    pub fn create_inventory_item(&self, item: &InventoryItem) -> Result<i64> {
        self.with_conn(|conn| {
            insert_inventory_item(conn, item).map_err(|e| {
                invalid_on_constraint(e, || {
                    format!("Inventory item references unknown warehouse {}", item.warehouse_id)
                })
            })
        })
    }

    pub fn get_inventory_item(&self, id: i64) -> Result<Option<InventoryItem>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT * FROM inventory_items WHERE id = ?1",
                [id],
                row_to_inventory_item,
            )
            .optional()
            .map_err(Into::into)
        })
    }

    pub fn list_inventory_items(&self) -> Result<Vec<InventoryItem>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM inventory_items ORDER BY id")?;
            let items = stmt
                .query_map([], row_to_inventory_item)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(items)
        })
    }

    pub fn items_for_warehouse(&self, warehouse_id: i64) -> Result<Vec<InventoryItem>> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT * FROM inventory_items WHERE warehouse_id = ?1 ORDER BY id")?;
            let items = stmt
                .query_map([warehouse_id], row_to_inventory_item)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(items)
        })
    }

    pub fn update_inventory_item(&self, item: &InventoryItem) -> Result<()> {
        let id = item
            .id
            .ok_or_else(|| AgroError::InvalidData("Inventory item has no ID".into()))?;

        self.with_conn(|conn| {
            let affected = conn
                .execute(
                    r#"
                    UPDATE inventory_items SET
                        warehouse_id = ?1, name = ?2, quantity = ?3, unit = ?4
                    WHERE id = ?5
                    "#,
                    params![item.warehouse_id, item.name, item.quantity, item.unit, id],
                )
                .map_err(|e| {
                    invalid_on_constraint(e, || {
                        format!("Inventory item references unknown warehouse {}", item.warehouse_id)
                    })
                })?;
            require_row(affected, "Inventory item", id)
        })
    }

    pub fn delete_inventory_item(&self, id: i64) -> Result<()> {
        self.with_conn(|conn| {
            let affected = conn.execute("DELETE FROM inventory_items WHERE id = ?1", [id])?;
            require_row(affected, "Inventory item", id)
        })
    }
}

fn row_to_inventory_item(row: &Row) -> rusqlite::Result<InventoryItem> {
    Ok(InventoryItem {
        id: Some(row.get("id")?),
        warehouse_id: row.get("warehouse_id")?,
        name: row.get("name")?,
        quantity: row.get("quantity")?,
        unit: row.get("unit")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warehouse_and_items_round_trip() {
        let db = Database::open_in_memory().unwrap();
        let wh = db
            .create_warehouse(&Warehouse::new(Some("North Barn".into())))
            .unwrap();
        let item_id = db
            .create_inventory_item(&InventoryItem::new(wh, "Wheat Seeds", 1200, "kg"))
            .unwrap();

        let mut item = db.get_inventory_item(item_id).unwrap().unwrap();
        assert_eq!(item.name, "Wheat Seeds");
        item.quantity = 900;
        db.update_inventory_item(&item).unwrap();
        assert_eq!(db.get_inventory_item(item_id).unwrap().unwrap().quantity, 900);

        let mut warehouse = db.get_warehouse(wh).unwrap().unwrap();
        assert_eq!(warehouse.name.as_deref(), Some("North Barn"));
        warehouse.name = None;
        db.update_warehouse(&warehouse).unwrap();
        assert_eq!(db.get_warehouse(wh).unwrap().unwrap().name, None);
        assert_eq!(db.items_for_warehouse(wh).unwrap().len(), 1);
    }

    #[test]
    fn deleting_warehouse_cascades_to_items() {
        let db = Database::open_in_memory().unwrap();
        let wh = db.create_warehouse(&Warehouse::new(None)).unwrap();
        let item_id = db
            .create_inventory_item(&InventoryItem::new(wh, "Tires", 8, "pieces"))
            .unwrap();

        db.delete_warehouse(wh).unwrap();
        assert!(db.get_inventory_item(item_id).unwrap().is_none());
        assert!(db.list_inventory_items().unwrap().is_empty());
    }

    #[test]
    fn item_for_unknown_warehouse_is_invalid() {
        let db = Database::open_in_memory().unwrap();
        let err = db
            .create_inventory_item(&InventoryItem::new(5, "Filters", 3, "boxes"))
            .unwrap_err();
        assert!(matches!(err, AgroError::InvalidData(_)));
    }
}
