//! Statement text and bindings for every operation.

mod common;

use common::{BadBoy, BadGirl, Boy, Girl, dotnet_girl, registry, registry_with, sanja};
use entitysql::ArgumentErrorKind;
use entitysql::prelude::*;

fn names(statement: &StatementBuilder) -> Vec<String> {
    statement.query_parameters().names()
}

#[test]
fn insert_binds_every_non_null_property() {
    let registry = registry();
    let sql = EntitySql::new(&registry);

    let insert = sql.insert(&sanja()).unwrap();
    assert_eq!(
        insert.generate_query(),
        "insert into GIRL (ID, NAME, SPECIALITY) values (:girl.id, :girl.name, :girl.speciality)"
    );
    assert_eq!(names(&insert), vec!["girl.id", "girl.name", "girl.speciality"]);
    assert_eq!(
        insert.query_parameters().get("girl.name").unwrap().value(),
        &Value::Text("sanja".to_string())
    );

    let insert = sql.insert(&dotnet_girl()).unwrap();
    assert_eq!(
        insert.generate_query(),
        "insert into GIRL (ID, SPECIALITY) values (:badGirl.fooid, :badGirl.foospeciality)"
    );
    assert_eq!(insert.query_parameters().len(), 2);
}

#[test]
fn truncate_has_no_predicate() {
    let registry = registry();
    let sql = EntitySql::new(&registry);

    let by_instance = sql.truncate(&sanja()).unwrap();
    let by_type = sql.truncate_type::<BadGirl>().unwrap();
    assert_eq!(by_instance.generate_query(), "delete from GIRL");
    assert_eq!(by_type.generate_query(), "delete from GIRL");
    assert!(by_instance.query_parameters().is_empty());
}

#[test]
fn update_without_key_is_tautological() {
    let registry = registry();
    let sql = EntitySql::new(&registry);

    let update = sql.update(&sanja()).unwrap();
    assert_eq!(
        update.generate_query(),
        "update GIRL Girl_ set ID=:girl.id, NAME=:girl.name, SPECIALITY=:girl.speciality  where (1=1)"
    );
    assert_eq!(update.query_parameters().len(), 3);
}

#[test]
fn update_keeps_key_out_of_set() {
    let registry = registry();
    let sql = EntitySql::new(&registry);

    let update = sql.update(&dotnet_girl()).unwrap();
    assert_eq!(
        update.generate_query(),
        "update GIRL BadGirl_ set SPECIALITY=:badGirl.foospeciality  where (BadGirl_.ID=:badGirl.fooid)"
    );
    assert_eq!(names(&update), vec!["badGirl.foospeciality", "badGirl.fooid"]);
}

#[test]
fn nothing_to_write_is_rejected() {
    let registry = registry();
    let sql = EntitySql::new(&registry);
    let key_only = BadGirl {
        fooid: Some(2),
        ..BadGirl::default()
    };

    for err in [
        sql.update(&key_only).unwrap_err(),
        sql.insert(&Girl::default()).unwrap_err(),
    ] {
        match err {
            Error::Argument(e) => assert_eq!(e.kind, ArgumentErrorKind::NoColumns),
            other => panic!("expected argument error, got {other:?}"),
        }
    }

    // With keys in SET the same instance still has something to write.
    let registry = registry_with(EntitySqlConfig::new().with_primary_keys_in_set(true));
    let sql = EntitySql::new(&registry);
    assert_eq!(
        sql.update(&key_only).unwrap().generate_query(),
        "update GIRL BadGirl_ set ID=:badGirl.fooid  where (BadGirl_.ID=:badGirl.fooid)"
    );
}

#[test]
fn update_all_sets_every_column() {
    let registry = registry();
    let sql = EntitySql::new(&registry);

    let update = sql.update_all(&dotnet_girl()).unwrap();
    assert_eq!(
        update.generate_query(),
        "update GIRL BadGirl_ set ID=:badGirl.fooid, NAME=:badGirl.fooname, \
         SPECIALITY=:badGirl.foospeciality  where (BadGirl_.ID=:badGirl.fooid)"
    );
    // fooid is used twice but bound once
    assert_eq!(update.query_parameters().len(), 3);
    assert!(
        update
            .query_parameters()
            .get("badGirl.fooname")
            .unwrap()
            .value()
            .is_null()
    );
}

#[test]
fn update_column_binds_literal_first() {
    let registry = registry();
    let sql = EntitySql::new(&registry);
    let girl = BadGirl {
        fooid: Some(1),
        ..BadGirl::default()
    };

    let update = sql.update_column(&girl, "fooname", "Anja").unwrap();
    assert_eq!(
        update.generate_query(),
        "update GIRL BadGirl_ set NAME=:p0 where (BadGirl_.ID=:badGirl.fooid)"
    );
    assert_eq!(names(&update), vec!["p0", "badGirl.fooid"]);
    let params = update.query_parameters();
    assert_eq!(params.get("p0").unwrap().value(), &Value::from("Anja"));
    assert_eq!(params.get("badGirl.fooid").unwrap().value(), &Value::Int(1));
}

#[test]
fn delete_matches_non_null_columns() {
    let registry = registry();
    let sql = EntitySql::new(&registry);

    let delete = sql.delete(&dotnet_girl()).unwrap();
    assert_eq!(
        delete.generate_query(),
        "delete from GIRL where (GIRL.ID=:badGirl.fooid and GIRL.SPECIALITY=:badGirl.foospeciality)"
    );
    assert_eq!(delete.query_parameters().len(), 2);
}

#[test]
fn delete_by_all_matches_nulls_too() {
    let registry = registry();
    let sql = EntitySql::new(&registry);

    let delete = sql.delete_by_all(&dotnet_girl()).unwrap();
    assert_eq!(
        delete.generate_query(),
        "delete from GIRL where (GIRL.ID=:badGirl.fooid and GIRL.NAME=:badGirl.fooname \
         and GIRL.SPECIALITY=:badGirl.foospeciality)"
    );
    assert_eq!(delete.query_parameters().len(), 3);
}

#[test]
fn delete_by_id_from_instance_or_literal() {
    let registry = registry();
    let sql = EntitySql::new(&registry);

    let by_instance = sql.delete_by_id(&dotnet_girl()).unwrap();
    assert_eq!(
        by_instance.generate_query(),
        "delete from GIRL where (GIRL.ID=:badGirl.fooid)"
    );
    assert_eq!(by_instance.query_parameters().len(), 1);

    let by_literal = sql.delete_by_id_value::<BadGirl>(2).unwrap();
    assert_eq!(by_literal.generate_query(), "delete from GIRL where GIRL.ID=:p0");
    assert_eq!(
        by_literal.query_parameters().get("p0").unwrap().value(),
        &Value::Int(2)
    );
}

#[test]
fn from_projects_every_column() {
    let registry = registry();
    let sql = EntitySql::new(&registry);

    let from = sql.from(&sanja()).unwrap();
    assert_eq!(
        from.generate_query(),
        "select Girl_.ID, Girl_.NAME, Girl_.SPECIALITY from GIRL Girl_ "
    );
    assert!(from.query_parameters().is_empty());
    assert_eq!(
        sql.from_type::<Girl>().unwrap().generate_query(),
        from.generate_query()
    );

    let aliased = sql.from_as(&dotnet_girl(), "ggg").unwrap();
    assert_eq!(
        aliased.generate_query(),
        "select ggg.ID, ggg.NAME, ggg.SPECIALITY from GIRL ggg "
    );
}

#[test]
fn find_matches_with_alias() {
    let registry = registry();
    let sql = EntitySql::new(&registry);

    let find = sql.find(&sanja()).unwrap();
    assert_eq!(
        find.generate_query(),
        "select Girl_.ID, Girl_.NAME, Girl_.SPECIALITY from GIRL Girl_ \
         where (Girl_.ID=:girl.id and Girl_.NAME=:girl.name and Girl_.SPECIALITY=:girl.speciality)"
    );
    assert_eq!(find.query_parameters().len(), 3);

    let find_all = sql.find_by_all(&dotnet_girl()).unwrap();
    assert_eq!(
        find_all.generate_query(),
        "select BadGirl_.ID, BadGirl_.NAME, BadGirl_.SPECIALITY from GIRL BadGirl_ \
         where (BadGirl_.ID=:badGirl.fooid and BadGirl_.NAME=:badGirl.fooname \
         and BadGirl_.SPECIALITY=:badGirl.foospeciality)"
    );
    assert_eq!(find_all.query_parameters().len(), 3);
}

#[test]
fn find_by_column_is_a_single_term() {
    let registry = registry();
    let sql = EntitySql::new(&registry);

    let find = sql.find_by_column::<Girl>("name", "sanja").unwrap();
    assert_eq!(
        find.generate_query(),
        "select Girl_.ID, Girl_.NAME, Girl_.SPECIALITY from GIRL Girl_ where Girl_.NAME=:p0"
    );
    assert_eq!(names(&find), vec!["p0"]);
}

#[test]
fn find_by_id_from_instance_or_literal() {
    let registry = registry();
    let sql = EntitySql::new(&registry);

    let by_instance = sql.find_by_id(&dotnet_girl()).unwrap();
    assert_eq!(
        by_instance.generate_query(),
        "select BadGirl_.ID, BadGirl_.NAME, BadGirl_.SPECIALITY from GIRL BadGirl_ \
         where (BadGirl_.ID=:badGirl.fooid)"
    );

    let by_literal = sql.find_by_id_value::<BadGirl>(2).unwrap();
    assert_eq!(
        by_literal.generate_query(),
        "select BadGirl_.ID, BadGirl_.NAME, BadGirl_.SPECIALITY from GIRL BadGirl_ \
         where BadGirl_.ID=:p0"
    );
}

#[test]
fn find_foreign_follows_declared_reference() {
    let registry = registry();
    let sql = EntitySql::new(&registry);

    let children = sql.find_foreign::<BadBoy, _>(&dotnet_girl()).unwrap();
    assert_eq!(
        children.generate_query(),
        "select BadBoy_.ID, BadBoy_.GIRL_ID, BadBoy_.NAME from BOY BadBoy_ where BadBoy_.GIRL_ID=:p0"
    );
    assert_eq!(
        children.query_parameters().get("p0").unwrap().value(),
        &Value::Int(2)
    );
}

#[test]
fn find_foreign_follows_naming_convention() {
    let registry = registry();
    let sql = EntitySql::new(&registry);

    let children = sql.find_foreign::<Boy, _>(&dotnet_girl()).unwrap();
    assert_eq!(
        children.generate_query(),
        "select Boy_.ID, Boy_.GIRL_ID, Boy_.NAME from BOY Boy_ where Boy_.GIRL_ID=:p0"
    );
    assert_eq!(children.query_parameters().len(), 1);
}

#[test]
fn count_by_instance_and_by_type() {
    let registry = registry();
    let sql = EntitySql::new(&registry);

    let count = sql.count(&sanja()).unwrap();
    assert_eq!(
        count.generate_query(),
        "select count(*) from GIRL Girl_ \
         where (Girl_.ID=:girl.id and Girl_.NAME=:girl.name and Girl_.SPECIALITY=:girl.speciality)"
    );

    let empty = sql.count(&BadGirl::default()).unwrap();
    assert_eq!(
        empty.generate_query(),
        "select count(*) from GIRL BadGirl_ where (1=1)"
    );
    assert!(empty.query_parameters().is_empty());

    let by_type = sql.count_type::<BadGirl>().unwrap();
    assert_eq!(by_type.generate_query(), "select count(*) from GIRL BadGirl_");
    assert!(by_type.query_parameters().is_empty());

    let count_all = sql.count_all(&BadGirl::default()).unwrap();
    assert_eq!(
        count_all.generate_query(),
        "select count(*) from GIRL BadGirl_ where (BadGirl_.ID=:badGirl.fooid \
         and BadGirl_.NAME=:badGirl.fooname and BadGirl_.SPECIALITY=:badGirl.foospeciality)"
    );
    assert!(
        count_all
            .query_parameters()
            .values()
            .iter()
            .all(|v| v.is_null())
    );
}

#[test]
fn column_arithmetic_orders_amount_then_id() {
    let registry = registry();
    let sql = EntitySql::new(&registry);

    let up = sql.increase_column::<BadBoy>(1, "nejm", 5, true).unwrap();
    assert_eq!(
        up.generate_query(),
        "update BOY set NAME=NAME+:p0 where BOY.ID=:p1"
    );
    let params = up.query_parameters();
    assert_eq!(params.get("p0").unwrap().value(), &Value::Int(5));
    assert_eq!(params.get("p1").unwrap().value(), &Value::Int(1));

    let down = sql.increase_column::<BadBoy>(1, "nejm", 5, false).unwrap();
    assert_eq!(
        down.generate_query(),
        "update BOY set NAME=NAME-:p0 where BOY.ID=:p1"
    );
    assert_eq!(
        sql.decrease_column::<BadBoy>(1, "nejm", 5)
            .unwrap()
            .generate_query(),
        down.generate_query()
    );
}

#[test]
fn generation_is_idempotent() {
    let registry = registry();
    let sql = EntitySql::new(&registry);

    let statement = sql.update_all(&dotnet_girl()).unwrap();
    let first = statement.generate_query();
    assert_eq!(first, statement.generate_query());
    assert_eq!(first, statement.to_string());

    let again = sql.update_all(&dotnet_girl()).unwrap();
    assert_eq!(again, statement);
}
