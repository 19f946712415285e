use canvass_core::db::open_db_in_memory;
use canvass_core::{
    NewPerson, PersonRepository, PersonService, PersonValidationError, RepoError,
    SqlitePersonRepository,
};

fn new_person(first: &str, last: &str) -> NewPerson {
    NewPerson {
        first_name: first.to_string(),
        last_name: last.to_string(),
        ..NewPerson::default()
    }
}

#[test]
fn create_returns_stored_record_with_id_and_timestamps() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::new(&conn);

    let created = repo
        .create_person(&NewPerson {
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: Some("john@example.com".to_string()),
            notes: Some("Great conversation about policy".to_string()),
        })
        .unwrap();

    assert!(created.id >= 1);
    assert_eq!(created.first_name, "John");
    assert_eq!(created.last_name, "Doe");
    assert_eq!(created.email.as_deref(), Some("john@example.com"));
    assert_eq!(created.notes, "Great conversation about policy");
    assert!(created.created_at > 0);
    assert_eq!(created.created_at, created.updated_at);
}

#[test]
fn create_trims_names_and_collapses_blank_email() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::new(&conn);

    let created = repo
        .create_person(&NewPerson {
            first_name: "  Ada ".to_string(),
            last_name: " Lovelace  ".to_string(),
            email: Some("   ".to_string()),
            notes: None,
        })
        .unwrap();

    assert_eq!(created.first_name, "Ada");
    assert_eq!(created.last_name, "Lovelace");
    assert_eq!(created.email, None);
    assert_eq!(created.notes, "");
}

#[test]
fn create_rejects_blank_required_names_in_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::new(&conn);

    let err = repo.create_person(&new_person("   ", "Doe")).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(PersonValidationError::MissingFirstName)
    ));

    let err = repo.create_person(&new_person("John", " ")).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(PersonValidationError::MissingLastName)
    ));

    // First violation wins even when several fields are bad.
    let err = repo
        .create_person(&NewPerson {
            email: Some("broken".to_string()),
            ..NewPerson::default()
        })
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(PersonValidationError::MissingFirstName)
    ));
}

#[test]
fn create_rejects_email_without_at_sign() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::new(&conn);

    let err = repo
        .create_person(&NewPerson {
            email: Some("john.example.com".to_string()),
            ..new_person("John", "Doe")
        })
        .unwrap_err();

    assert!(matches!(
        err,
        RepoError::Validation(PersonValidationError::InvalidEmail)
    ));
    assert_eq!(err.to_string(), "Please enter a valid email address");
}

#[test]
fn update_notes_changes_only_notes_and_updated_at() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::new(&conn);
    let service = PersonService::new(SqlitePersonRepository::new(&conn));

    let created = repo
        .create_person(&NewPerson {
            email: Some("john@example.com".to_string()),
            notes: Some("initial".to_string()),
            ..new_person("John", "Doe")
        })
        .unwrap();

    // Backdate the row so the refresh is observable even within one second.
    conn.execute(
        "UPDATE canvassing_record SET created_at = 1000, updated_at = 1000;",
        [],
    )
    .unwrap();

    let updated = service
        .update_notes(created.id, Some("spoke again, still interested"))
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.first_name, "John");
    assert_eq!(updated.last_name, "Doe");
    assert_eq!(updated.email.as_deref(), Some("john@example.com"));
    assert_eq!(updated.notes, "spoke again, still interested");
    assert_eq!(updated.created_at, 1000);
    assert!(updated.updated_at > 1000);
}

#[test]
fn update_notes_with_omitted_value_clears_to_empty_string() {
    let conn = open_db_in_memory().unwrap();
    let service = PersonService::new(SqlitePersonRepository::new(&conn));

    let created = service
        .create_person(&NewPerson {
            notes: Some("will be cleared".to_string()),
            ..new_person("John", "Doe")
        })
        .unwrap();

    let updated = service.update_notes(created.id, None).unwrap();
    assert_eq!(updated.notes, "");
}

#[test]
fn update_notes_on_missing_id_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = PersonService::new(SqlitePersonRepository::new(&conn));

    let err = service.update_notes(42, Some("anything")).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(42)));
    assert_eq!(err.to_string(), "person not found: 42");
}

#[test]
fn list_people_orders_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::new(&conn);

    let first = repo.create_person(&new_person("First", "Person")).unwrap();
    let second = repo.create_person(&new_person("Second", "Person")).unwrap();
    let third = repo.create_person(&new_person("Third", "Person")).unwrap();

    // Distinct creation instants for a deterministic primary ordering.
    conn.execute(
        "UPDATE canvassing_record SET created_at = id * 1000;",
        [],
    )
    .unwrap();

    let people = repo.list_people().unwrap();
    let ids: Vec<_> = people.iter().map(|person| person.id).collect();
    assert_eq!(ids, vec![third.id, second.id, first.id]);
}

#[test]
fn get_person_returns_none_for_missing_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::new(&conn);

    assert!(repo.get_person(7).unwrap().is_none());
}
