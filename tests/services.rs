use client_registry::dto::client::ClientDto;
use client_registry::repository::{DieselRepository, PageRequest};
use client_registry::services::ServiceError;
use client_registry::services::client::{
    delete_client, find_all_clients_paged, find_client_by_cpf, find_client_by_id,
    find_clients_by_income, insert_client, update_client,
};

use common::date;

mod common;

/// Seeds the "Fulano" client and returns its id.
fn seed(repo: &DieselRepository) -> i32 {
    let dto = ClientDto::new("Fulano", 5000.0, date(2023, 1, 1));
    insert_client(repo, &dto).unwrap().id.unwrap()
}

fn first_page() -> PageRequest {
    PageRequest::new(0, 10).unwrap()
}

#[test]
fn test_delete_existing_then_find_is_not_found() {
    let test_db = common::TestDb::new("test_delete_existing_then_find_is_not_found.db");
    let repo = test_db.repo();
    let id = seed(&repo);

    delete_client(&repo, id).unwrap();

    assert!(matches!(
        find_client_by_id(&repo, id),
        Err(ServiceError::NotFound)
    ));
}

#[test]
fn test_delete_missing_is_empty_result() {
    let test_db = common::TestDb::new("test_delete_missing_is_empty_result.db");
    let repo = test_db.repo();
    seed(&repo);

    assert!(matches!(
        delete_client(&repo, 999),
        Err(ServiceError::EmptyResult)
    ));
}

#[test]
fn test_find_all_paged() {
    let test_db = common::TestDb::new("test_find_all_paged.db");
    let repo = test_db.repo();
    seed(&repo);

    let page = find_all_clients_paged(&repo, &first_page()).unwrap();
    assert!(!page.is_empty());
    assert_eq!(page.total_elements, 1);

    let past_end = find_all_clients_paged(&repo, &PageRequest::new(1, 10).unwrap()).unwrap();
    assert!(past_end.is_empty());
}

#[test]
fn test_find_by_income() {
    let test_db = common::TestDb::new("test_find_by_income.db");
    let repo = test_db.repo();
    seed(&repo);

    let page = find_clients_by_income(&repo, 5000.0, &first_page()).unwrap();
    assert_eq!(page.total_elements, 1);
    assert_eq!(page.items[0].name, "Fulano");

    let none = find_clients_by_income(&repo, 4999.99, &first_page()).unwrap();
    assert!(none.is_empty());
}

#[test]
fn test_find_by_id() {
    let test_db = common::TestDb::new("test_find_by_id.db");
    let repo = test_db.repo();
    let id = seed(&repo);

    let dto = find_client_by_id(&repo, id).unwrap();
    assert_eq!(dto.name, "Fulano");

    assert!(matches!(
        find_client_by_id(&repo, 999),
        Err(ServiceError::NotFound)
    ));
}

#[test]
fn test_insert_then_find_returns_equal_dto() {
    let test_db = common::TestDb::new("test_insert_then_find_returns_equal_dto.db");
    let repo = test_db.repo();

    let mut dto = ClientDto::new("Novo Cliente", 3000.0, date(1999, 12, 31));
    dto.cpf = Some("123.456.789-00".to_string());
    dto.children = 2;
    dto.id = Some(777);

    let stored = insert_client(&repo, &dto).unwrap();
    let id = stored.id.expect("id assigned");
    assert_ne!(id, 777);

    let fetched = find_client_by_id(&repo, id).unwrap();
    assert_eq!(fetched, stored);
    assert_eq!(fetched.name, "Novo Cliente");
    assert_eq!(fetched.cpf.as_deref(), Some("123.456.789-00"));

    let by_cpf = find_client_by_cpf(&repo, "123.456.789-00").unwrap();
    assert_eq!(by_cpf.id, Some(id));
}

#[test]
fn test_update_replaces_fields_and_keeps_id() {
    let test_db = common::TestDb::new("test_update_replaces_fields_and_keeps_id.db");
    let repo = test_db.repo();
    let id = seed(&repo);

    let mut dto = find_client_by_id(&repo, id).unwrap();
    dto.name = "Novo Nome".to_string();
    dto.id = Some(id + 100);

    let updated = update_client(&repo, id, &dto).unwrap();
    assert_eq!(updated.id, Some(id));
    assert_eq!(updated.name, "Novo Nome");

    let fetched = find_client_by_id(&repo, id).unwrap();
    assert_eq!(fetched.id, Some(id));
    assert_eq!(fetched.name, "Novo Nome");
    assert_eq!(fetched.income, 5000.0);
    assert_eq!(fetched.birth_date, date(2023, 1, 1));
}

#[test]
fn test_update_missing_is_not_found() {
    let test_db = common::TestDb::new("test_update_missing_is_not_found.db");
    let repo = test_db.repo();
    let id = seed(&repo);
    let dto = find_client_by_id(&repo, id).unwrap();

    assert!(matches!(
        update_client(&repo, 999, &dto),
        Err(ServiceError::NotFound)
    ));
}

#[test]
fn test_malformed_page_request_is_invalid_argument() {
    let err = PageRequest::new(-1, 10).map_err(ServiceError::from).unwrap_err();
    assert!(matches!(err, ServiceError::InvalidArgument(_)));

    let err = PageRequest::new(0, 0).map_err(ServiceError::from).unwrap_err();
    assert!(matches!(err, ServiceError::InvalidArgument(_)));
}
