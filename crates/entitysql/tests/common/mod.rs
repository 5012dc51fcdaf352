//! Entities shared by the integration tests.

#![allow(dead_code)]

use entitysql::prelude::*;

/// Unkeyed mapping of the GIRL table.
#[derive(Entity, Debug, Clone, Default)]
#[entity(table = "GIRL")]
pub struct Girl {
    pub id: Option<i32>,
    pub name: Option<String>,
    pub speciality: Option<String>,
}

/// Keyed mapping of the GIRL table with renamed properties.
#[derive(Entity, Debug, Clone, Default)]
#[entity(table = "GIRL")]
pub struct BadGirl {
    #[entity(id, column = "ID")]
    pub fooid: Option<i32>,
    #[entity(column = "NAME")]
    pub fooname: Option<String>,
    #[entity(column = "SPECIALITY")]
    pub foospeciality: Option<String>,
}

/// BOY table, referencing GIRL by column name only.
#[derive(Entity, Debug, Clone, Default)]
#[entity(table = "BOY")]
pub struct Boy {
    #[entity(id)]
    pub id: Option<i32>,
    pub girl_id: Option<i32>,
    pub name: Option<String>,
}

/// BOY table with a declared reference to GIRL.
#[derive(Entity, Debug, Clone, Default)]
#[entity(table = "BOY")]
pub struct BadBoy {
    #[entity(primary_key, column = "ID")]
    pub ajdi: Option<i32>,
    #[entity(column = "GIRL_ID", foreign_key = "GIRL.ID")]
    pub cool_girl_id: Option<i32>,
    #[entity(column = "NAME")]
    pub nejm: Option<String>,
}

pub fn sanja() -> Girl {
    Girl {
        id: Some(1),
        name: Some("sanja".to_string()),
        speciality: Some("c++".to_string()),
    }
}

pub fn dotnet_girl() -> BadGirl {
    BadGirl {
        fooid: Some(2),
        fooname: None,
        foospeciality: Some(".net".to_string()),
    }
}

/// Registry with all four fixtures registered.
pub fn registry() -> EntityRegistry {
    registry_with(EntitySqlConfig::default())
}

pub fn registry_with(config: EntitySqlConfig) -> EntityRegistry {
    let registry = EntityRegistry::with_config(config);
    registry.register::<Girl>().unwrap();
    registry.register::<BadGirl>().unwrap();
    registry.register::<Boy>().unwrap();
    registry.register::<BadBoy>().unwrap();
    registry
}
