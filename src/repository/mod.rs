use chrono::{DateTime, Utc};

use crate::{
    db::{DbConnection, DbPool, get_connection},
    domain::{
        client::{Client, NewClient, UpdateClient},
        types::{ChildrenCount, ClientId, Cpf, TypeConstraintError},
    },
    pagination::Page,
    repository::errors::RepositoryResult,
};

pub mod client;
pub mod errors;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;

/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: i64 = 1000;

/// Diesel-backed repository. Holds only the pool, so clones are cheap and it
/// can be shared between threads.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(get_connection(&self.pool)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientSortField {
    Id,
    Name,
    Cpf,
    Income,
    BirthDate,
    Children,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Ordering applied to a paged query. Ties are always broken by id ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: ClientSortField,
    pub direction: SortDirection,
}

impl Sort {
    pub fn asc(field: ClientSortField) -> Self {
        Self {
            field,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: ClientSortField) -> Self {
        Self {
            field,
            direction: SortDirection::Desc,
        }
    }
}

/// Zero-based page descriptor. Only constructible through [`PageRequest::new`],
/// so every instance has a non-negative index and a positive size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    page: usize,
    size: usize,
    offset: i64,
    sort: Option<Sort>,
}

impl PageRequest {
    pub fn new(page: i64, size: i64) -> Result<Self, TypeConstraintError> {
        if page < 0 {
            return Err(TypeConstraintError::InvalidPagination(format!(
                "page index must not be negative, got {page}"
            )));
        }
        if size <= 0 {
            return Err(TypeConstraintError::InvalidPagination(format!(
                "page size must be positive, got {size}"
            )));
        }
        if size > MAX_PAGE_SIZE {
            return Err(TypeConstraintError::InvalidPagination(format!(
                "page size must not exceed {MAX_PAGE_SIZE}, got {size}"
            )));
        }
        let offset = page.checked_mul(size).ok_or_else(|| {
            TypeConstraintError::InvalidPagination("page offset is out of range".to_string())
        })?;

        let page = usize::try_from(page).map_err(|_| {
            TypeConstraintError::InvalidPagination("page index is out of range".to_string())
        })?;
        let size = usize::try_from(size).map_err(|_| {
            TypeConstraintError::InvalidPagination("page size is out of range".to_string())
        })?;

        Ok(Self {
            page,
            size,
            offset,
            sort: None,
        })
    }

    pub fn sorted(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn sort(&self) -> Option<Sort> {
        self.sort
    }

    /// Row offset for SQL `OFFSET`, computed in `i64` when the request is built.
    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn limit(&self) -> i64 {
        // `size` came from an `i64` no larger than `MAX_PAGE_SIZE`.
        self.size as i64
    }
}

/// Read-side query operations over the client collection.
///
/// Lists are ordered by id ascending unless the method says otherwise.
pub trait ClientReader {
    fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>>;
    fn list_clients(&self, page: &PageRequest) -> RepositoryResult<Page<Client>>;

    /// Exact CPF match. Several matches resolve to the lowest id.
    fn find_client_by_cpf(&self, cpf: &Cpf) -> RepositoryResult<Option<Client>>;
    /// `pattern` is a raw SQL `LIKE` pattern; `%` and `_` keep their meaning.
    fn find_clients_by_cpf_like(&self, pattern: &str) -> RepositoryResult<Vec<Client>>;
    fn page_clients_by_cpf_like(
        &self,
        pattern: &str,
        page: &PageRequest,
    ) -> RepositoryResult<Page<Client>>;
    fn find_clients_by_cpf_containing(&self, part: &str) -> RepositoryResult<Vec<Client>>;
    fn page_clients_by_cpf_starting_with(
        &self,
        prefix: &str,
        page: &PageRequest,
    ) -> RepositoryResult<Page<Client>>;

    /// Case-insensitive substring match on the name.
    fn find_clients_by_name_containing(&self, text: &str) -> RepositoryResult<Vec<Client>>;
    /// Case-insensitive full-name match. `None` when nothing matches; several
    /// matches resolve to the lowest id.
    fn find_client_by_name(&self, name: &str) -> RepositoryResult<Option<Client>>;
    /// Case-insensitive full-name match that requires exactly one row.
    /// Fails with `NotFound` or `NonUniqueResult`.
    fn get_client_by_name(&self, name: &str) -> RepositoryResult<Client>;

    fn find_clients_with_income_at_least(&self, income: f64) -> RepositoryResult<Vec<Client>>;
    fn find_clients_with_income_at_most(&self, income: f64) -> RepositoryResult<Vec<Client>>;
    fn find_clients_with_income_less_than(&self, income: f64) -> RepositoryResult<Vec<Client>>;
    /// Inclusive on both ends. `min > max` yields an empty list.
    fn find_clients_with_income_between(&self, min: f64, max: f64)
    -> RepositoryResult<Vec<Client>>;
    fn find_clients_with_income_greater_than(&self, income: f64)
    -> RepositoryResult<Vec<Client>>;
    fn page_clients_with_income_greater_than(
        &self,
        income: f64,
        page: &PageRequest,
    ) -> RepositoryResult<Page<Client>>;
    fn page_clients_by_income(
        &self,
        income: f64,
        page: &PageRequest,
    ) -> RepositoryResult<Page<Client>>;

    /// Inclusive on both ends; swapped bounds are not reordered.
    fn find_clients_born_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepositoryResult<Vec<Client>>;
    /// Ordered by name ascending, then id ascending.
    fn find_clients_with_children_at_least(
        &self,
        children: ChildrenCount,
    ) -> RepositoryResult<Vec<Client>>;
}

/// Write-side operations. Each call is atomic on its own.
pub trait ClientWriter {
    fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client>;
    fn create_clients(&self, new_clients: &[NewClient]) -> RepositoryResult<usize>;
    /// Replaces every mutable field. Fails with `NotFound` for unknown ids.
    fn update_client(&self, client_id: ClientId, updates: &UpdateClient)
    -> RepositoryResult<Client>;
    /// Returns the number of deleted rows (0 or 1).
    fn delete_client(&self, client_id: ClientId) -> RepositoryResult<usize>;
    fn delete_clients_by_cpf(&self, cpf: &Cpf) -> RepositoryResult<usize>;
    fn delete_clients_with_income_greater_than(&self, income: f64) -> RepositoryResult<usize>;
}
