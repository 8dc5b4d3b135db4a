//! Mock repository implementations for isolating services in tests.

use chrono::{DateTime, Utc};
use mockall::mock;

use crate::domain::client::{Client, NewClient, UpdateClient};
use crate::domain::types::{ChildrenCount, ClientId, Cpf};
use crate::pagination::Page;
use crate::repository::errors::RepositoryResult;
use crate::repository::{ClientReader, ClientWriter, PageRequest};

mock! {
    pub Repository {}

    impl ClientReader for Repository {
        fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>>;
        fn list_clients(&self, page: &PageRequest) -> RepositoryResult<Page<Client>>;
        fn find_client_by_cpf(&self, cpf: &Cpf) -> RepositoryResult<Option<Client>>;
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
        fn find_clients_by_name_containing(&self, text: &str) -> RepositoryResult<Vec<Client>>;
        fn find_client_by_name(&self, name: &str) -> RepositoryResult<Option<Client>>;
        fn get_client_by_name(&self, name: &str) -> RepositoryResult<Client>;
        fn find_clients_with_income_at_least(&self, income: f64) -> RepositoryResult<Vec<Client>>;
        fn find_clients_with_income_at_most(&self, income: f64) -> RepositoryResult<Vec<Client>>;
        fn find_clients_with_income_less_than(&self, income: f64) -> RepositoryResult<Vec<Client>>;
        fn find_clients_with_income_between(
            &self,
            min: f64,
            max: f64,
        ) -> RepositoryResult<Vec<Client>>;
        fn find_clients_with_income_greater_than(
            &self,
            income: f64,
        ) -> RepositoryResult<Vec<Client>>;
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
        fn find_clients_born_between(
            &self,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> RepositoryResult<Vec<Client>>;
        fn find_clients_with_children_at_least(
            &self,
            children: ChildrenCount,
        ) -> RepositoryResult<Vec<Client>>;
    }

    impl ClientWriter for Repository {
        fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client>;
        fn create_clients(&self, new_clients: &[NewClient]) -> RepositoryResult<usize>;
        fn update_client(
            &self,
            client_id: ClientId,
            updates: &UpdateClient,
        ) -> RepositoryResult<Client>;
        fn delete_client(&self, client_id: ClientId) -> RepositoryResult<usize>;
        fn delete_clients_by_cpf(&self, cpf: &Cpf) -> RepositoryResult<usize>;
        fn delete_clients_with_income_greater_than(&self, income: f64) -> RepositoryResult<usize>;
    }
}
