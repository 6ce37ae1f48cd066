use super::{invalid_on_constraint, require_row};
use crate::db::Database;
use crate::error::{AgroError, Result};
use crate::models::{Machine, MachineType};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::warn;

pub(crate) fn insert_machine(conn: &Connection, machine: &Machine) -> rusqlite::Result<i64> {
    conn.execute(
        r#"
        INSERT INTO machines
            (machine_type, fuel_consumption, is_available, work_durality_per_hectare,
             field_id, resource_id)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
        params![
            machine.machine_type.as_str(),
            machine.fuel_consumption,
            machine.is_available,
            machine.work_durality_per_hectare,
            machine.field_id,
            machine.resource_id,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

impl Database {
    pub fn create_machine(&self, machine: &Machine) -> Result<i64> {
        self.with_conn(|conn| {
            insert_machine(conn, machine).map_err(|e| {
                invalid_on_constraint(e, || {
                    format!(
                        "Machine references unknown resource {} or field {:?}",
                        machine.resource_id, machine.field_id
                    )
                })
            })
        })
    }

    pub fn get_machine(&self, id: i64) -> Result<Option<Machine>> {
        self.with_conn(|conn| {
            conn.query_row("SELECT * FROM machines WHERE id = ?1", [id], row_to_machine)
                .optional()
                .map_err(Into::into)
        })
    }

    pub fn list_machines(&self) -> Result<Vec<Machine>> {
        self.query_machines("SELECT * FROM machines ORDER BY id", None)
    }

    pub fn machines_for_field(&self, field_id: i64) -> Result<Vec<Machine>> {
        self.query_machines(
            "SELECT * FROM machines WHERE field_id = ?1 ORDER BY id",
            Some(field_id),
        )
    }

    pub fn machines_for_resource(&self, resource_id: i64) -> Result<Vec<Machine>> {
        self.query_machines(
            "SELECT * FROM machines WHERE resource_id = ?1 ORDER BY id",
            Some(resource_id),
        )
    }

    pub fn count_machines_for_resource(&self, resource_id: i64) -> Result<u32> {
        self.with_conn(|conn| {
            let count: u32 = conn.query_row(
                "SELECT COUNT(*) FROM machines WHERE resource_id = ?1",
                [resource_id],
                |row| row.get(0),
            )?;
            Ok(count)
        })
    }

    fn query_machines(&self, sql: &str, key: Option<i64>) -> Result<Vec<Machine>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(sql)?;
            let rows = match key {
                Some(k) => stmt.query_map([k], row_to_machine)?,
                None => stmt.query_map([], row_to_machine)?,
            };
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
    }

    pub fn update_machine(&self, machine: &Machine) -> Result<()> {
        let id = machine
            .id
            .ok_or_else(|| AgroError::InvalidData("Machine has no ID".into()))?;

        self.with_conn(|conn| {
            let affected = conn
                .execute(
                    r#"
                    UPDATE machines SET
                        machine_type = ?1, fuel_consumption = ?2, is_available = ?3,
                        work_durality_per_hectare = ?4, field_id = ?5, resource_id = ?6
                    WHERE id = ?7
                    "#,
                    params![
                        machine.machine_type.as_str(),
                        machine.fuel_consumption,
                        machine.is_available,
                        machine.work_durality_per_hectare,
                        machine.field_id,
                        machine.resource_id,
                        id,
                    ],
                )
                .map_err(|e| {
                    invalid_on_constraint(e, || {
                        format!(
                            "Machine references unknown resource {} or field {:?}",
                            machine.resource_id, machine.field_id
                        )
                    })
                })?;
            require_row(affected, "Machine", id)
        })
    }

    pub fn delete_machine(&self, id: i64) -> Result<()> {
        self.with_conn(|conn| {
            let affected = conn.execute("DELETE FROM machines WHERE id = ?1", [id])?;
            require_row(affected, "Machine", id)
        })
    }
}

fn row_to_machine(row: &Row) -> rusqlite::Result<Machine> {
    let type_str: String = row.get("machine_type")?;
    let machine_type = MachineType::from_str(&type_str).unwrap_or_else(|| {
        warn!(machine_type = %type_str, "Unknown machine_type in database, defaulting to Tractor");
        MachineType::Tractor
    });

    Ok(Machine {
        id: Some(row.get("id")?),
        machine_type,
        fuel_consumption: row.get("fuel_consumption")?,
        is_available: row.get("is_available")?,
        work_durality_per_hectare: row.get("work_durality_per_hectare")?,
        field_id: row.get("field_id")?,
        resource_id: row.get("resource_id")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CultureType, Field, Resource};

    fn setup() -> (Database, i64, i64) {
        let db = Database::open_in_memory().unwrap();
        let resource_id = db.create_resource(&Resource::new(CultureType::Corn)).unwrap();
        let field_id = db.create_field(&Field::new(20.0, CultureType::Corn)).unwrap();
        (db, resource_id, field_id)
    }

    #[test]
    fn machine_crud_round_trip() {
        let (db, resource_id, field_id) = setup();
        let id = db
            .create_machine(
                &Machine::new(MachineType::Harvester, resource_id)
                    .with_fuel_consumption(25.0)
                    .with_work_durality(1.2)
                    .assigned_to(field_id),
            )
            .unwrap();

        let mut machine = db.get_machine(id).unwrap().unwrap();
        assert_eq!(machine.machine_type, MachineType::Harvester);
        assert_eq!(machine.field_id, Some(field_id));
        assert!(machine.is_available);

        machine.is_available = false;
        machine.field_id = None;
        db.update_machine(&machine).unwrap();
        let reloaded = db.get_machine(id).unwrap().unwrap();
        assert!(!reloaded.is_available);
        assert_eq!(reloaded.field_id, None);

        db.delete_machine(id).unwrap();
        assert!(matches!(db.delete_machine(id), Err(AgroError::NotFound(_))));
    }

    #[test]
    fn machines_by_field_and_resource() {
        let (db, resource_id, field_id) = setup();
        db.create_machine(&Machine::new(MachineType::Tractor, resource_id).assigned_to(field_id))
            .unwrap();
        db.create_machine(&Machine::new(MachineType::Plow, resource_id))
            .unwrap();

        assert_eq!(db.machines_for_field(field_id).unwrap().len(), 1);
        assert_eq!(db.machines_for_resource(resource_id).unwrap().len(), 2);
        assert_eq!(db.count_machines_for_resource(resource_id).unwrap(), 2);
        assert_eq!(db.list_machines().unwrap().len(), 2);
    }

    #[test]
    fn unknown_resource_is_invalid() {
        let (db, _, _) = setup();
        let err = db
            .create_machine(&Machine::new(MachineType::Sprayer, 404))
            .unwrap_err();
        assert!(matches!(err, AgroError::InvalidData(_)));
    }

    #[test]
    fn deleting_field_detaches_machines() {
        let (db, resource_id, field_id) = setup();
        let id = db
            .create_machine(&Machine::new(MachineType::Seeder, resource_id).assigned_to(field_id))
            .unwrap();

        db.delete_field(field_id).unwrap();
        assert_eq!(db.get_machine(id).unwrap().unwrap().field_id, None);
    }
}
