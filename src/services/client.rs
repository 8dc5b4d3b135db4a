//! Client use-cases: existence checks and DTO translation on top of the
//! query layer.

use validator::Validate;

use crate::domain::client::{NewClient, UpdateClient};
use crate::domain::types::{ClientId, Cpf};
use crate::dto::client::ClientDto;
use crate::pagination::Page;
use crate::repository::{ClientReader, ClientWriter, PageRequest};
use crate::services::{ServiceError, ServiceResult};

/// Returns the client with the given id or [`ServiceError::NotFound`].
pub fn find_client_by_id<R>(repo: &R, id: i32) -> ServiceResult<ClientDto>
where
    R: ClientReader + ?Sized,
{
    // Ids are always positive, so anything else cannot exist.
    let client_id = ClientId::new(id).map_err(|_| ServiceError::NotFound)?;

    let client = repo
        .get_client_by_id(client_id)?
        .ok_or(ServiceError::NotFound)?;

    Ok(client.into())
}

/// Returns one page of all clients. An empty page is not an error.
pub fn find_all_clients_paged<R>(repo: &R, page: &PageRequest) -> ServiceResult<Page<ClientDto>>
where
    R: ClientReader + ?Sized,
{
    let clients = repo.list_clients(page)?;
    Ok(clients.map(ClientDto::from))
}

/// Returns one page of clients whose income equals `income` exactly.
pub fn find_clients_by_income<R>(
    repo: &R,
    income: f64,
    page: &PageRequest,
) -> ServiceResult<Page<ClientDto>>
where
    R: ClientReader + ?Sized,
{
    let clients = repo.page_clients_by_income(income, page)?;
    Ok(clients.map(ClientDto::from))
}

/// Returns the client registered under `cpf` or [`ServiceError::NotFound`].
pub fn find_client_by_cpf<R>(repo: &R, cpf: &str) -> ServiceResult<ClientDto>
where
    R: ClientReader + ?Sized,
{
    let cpf = Cpf::new(cpf)?;

    let client = repo
        .find_client_by_cpf(&cpf)?
        .ok_or(ServiceError::NotFound)?;

    Ok(client.into())
}

/// Persists a new client. Any id present in `dto` is ignored.
pub fn insert_client<R>(repo: &R, dto: &ClientDto) -> ServiceResult<ClientDto>
where
    R: ClientWriter + ?Sized,
{
    dto.validate()?;
    let new_client = NewClient::try_from(dto)?;

    let client = repo.create_client(&new_client).map_err(|err| {
        log::error!("Failed to insert client: {err}");
        ServiceError::from(err)
    })?;

    log::info!("Created client {}", client.id);

    Ok(client.into())
}

/// Replaces every mutable field of an existing client.
///
/// The id carried by `dto` is ignored; the stored id never changes.
pub fn update_client<R>(repo: &R, id: i32, dto: &ClientDto) -> ServiceResult<ClientDto>
where
    R: ClientWriter + ?Sized,
{
    let client_id = ClientId::new(id).map_err(|_| ServiceError::NotFound)?;

    dto.validate()?;
    let updates = UpdateClient::try_from(dto)?;

    let client = repo.update_client(client_id, &updates).map_err(|err| {
        log::warn!("Failed to update client {client_id}: {err}");
        ServiceError::from(err)
    })?;

    log::info!("Updated client {}", client.id);

    Ok(client.into())
}

/// Deletes a client. Fails with [`ServiceError::EmptyResult`] when no row was
/// removed.
pub fn delete_client<R>(repo: &R, id: i32) -> ServiceResult<()>
where
    R: ClientWriter + ?Sized,
{
    let client_id = ClientId::new(id).map_err(|_| ServiceError::EmptyResult)?;

    match repo.delete_client(client_id)? {
        0 => Err(ServiceError::EmptyResult),
        _ => {
            log::info!("Deleted client {client_id}");
            Ok(())
        }
    }
}

/// Deletes every client registered under `cpf`, returning how many went away.
pub fn delete_clients_by_cpf<R>(repo: &R, cpf: &str) -> ServiceResult<usize>
where
    R: ClientWriter + ?Sized,
{
    let cpf = Cpf::new(cpf)?;
    let deleted = repo.delete_clients_by_cpf(&cpf)?;
    log::info!("Deleted {deleted} client(s) with cpf {cpf}");
    Ok(deleted)
}

/// Deletes every client earning strictly more than `income`.
pub fn delete_clients_with_income_greater_than<R>(repo: &R, income: f64) -> ServiceResult<usize>
where
    R: ClientWriter + ?Sized,
{
    let deleted = repo.delete_clients_with_income_greater_than(income)?;
    log::info!("Deleted {deleted} client(s) with income above {income}");
    Ok(deleted)
}
