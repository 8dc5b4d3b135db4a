//! Diesel implementation of the client query layer.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::{
    db::{fold_case, fold_case_str},
    domain::{
        client::{Client, NewClient, UpdateClient},
        types::{ChildrenCount, ClientId, Cpf},
    },
    models::client::{
        Client as DbClient, NewClient as DbNewClient, UpdateClient as DbUpdateClient,
    },
    pagination::Page,
    repository::{
        ClientReader, ClientSortField, ClientWriter, DieselRepository, PageRequest, Sort,
        SortDirection,
        errors::{RepositoryError, RepositoryResult},
    },
    schema::clients,
};

type BoxedClients<'a> = clients::BoxedQuery<'a, Sqlite>;

/// Escapes `LIKE` metacharacters so user text matches literally with `ESCAPE '\'`.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn into_domain(rows: Vec<DbClient>) -> RepositoryResult<Vec<Client>> {
    rows.into_iter()
        .map(|row| Client::try_from(row).map_err(RepositoryError::from))
        .collect()
}

fn apply_sort(query: BoxedClients<'_>, sort: Option<Sort>) -> BoxedClients<'_> {
    use ClientSortField as F;
    use SortDirection::{Asc, Desc};

    let Some(sort) = sort else {
        return query.order_by(clients::id.asc());
    };

    let query = match (sort.field, sort.direction) {
        (F::Id, Asc) => query.order_by(clients::id.asc()),
        (F::Id, Desc) => query.order_by(clients::id.desc()),
        (F::Name, Asc) => query.order_by(clients::name.asc()),
        (F::Name, Desc) => query.order_by(clients::name.desc()),
        (F::Cpf, Asc) => query.order_by(clients::cpf.asc()),
        (F::Cpf, Desc) => query.order_by(clients::cpf.desc()),
        (F::Income, Asc) => query.order_by(clients::income.asc()),
        (F::Income, Desc) => query.order_by(clients::income.desc()),
        (F::BirthDate, Asc) => query.order_by(clients::birth_date.asc()),
        (F::BirthDate, Desc) => query.order_by(clients::birth_date.desc()),
        (F::Children, Asc) => query.order_by(clients::children.asc()),
        (F::Children, Desc) => query.order_by(clients::children.desc()),
    };

    query.then_order_by(clients::id.asc())
}

/// Loads every row matched by `query`, ordered by id.
fn load_list(conn: &mut SqliteConnection, query: BoxedClients<'_>) -> RepositoryResult<Vec<Client>> {
    let rows = query
        .order_by(clients::id.asc())
        .load::<DbClient>(conn)?;
    into_domain(rows)
}

/// Counts the matches of `query_builder` and loads the requested slice.
fn load_page<'a, Q>(
    conn: &mut SqliteConnection,
    query_builder: Q,
    page: &PageRequest,
) -> RepositoryResult<Page<Client>>
where
    Q: Fn() -> BoxedClients<'a>,
{
    let total = query_builder().count().get_result::<i64>(conn)?;

    let rows = apply_sort(query_builder(), page.sort())
        .offset(page.offset())
        .limit(page.limit())
        .load::<DbClient>(conn)?;

    Ok(Page::new(
        into_domain(rows)?,
        page.page(),
        page.size(),
        total as usize,
    ))
}

/// Resolves an optional single result; several matches pick the lowest id.
fn first_of(query: &str, rows: Vec<DbClient>) -> RepositoryResult<Option<Client>> {
    if rows.len() > 1 {
        log::warn!("Query {query} matched more than one client, using the lowest id");
    }
    rows.into_iter()
        .next()
        .map(|row| Client::try_from(row).map_err(RepositoryError::from))
        .transpose()
}

/// Stored names are trimmed, so the lookup text is trimmed the same way.
fn name_equals<'a>(name: &str) -> BoxedClients<'a> {
    clients::table
        .filter(fold_case(clients::name).eq(fold_case_str(name.trim())))
        .into_boxed()
}

impl ClientReader for DieselRepository {
    fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>> {
        let mut conn = self.conn()?;
        let db_client = clients::table
            .find(id.get())
            .first::<DbClient>(&mut conn)
            .optional()?;

        db_client
            .map(|c| Client::try_from(c).map_err(RepositoryError::from))
            .transpose()
    }

    fn list_clients(&self, page: &PageRequest) -> RepositoryResult<Page<Client>> {
        let mut conn = self.conn()?;
        load_page(&mut conn, || clients::table.into_boxed(), page)
    }

    fn find_client_by_cpf(&self, cpf: &Cpf) -> RepositoryResult<Option<Client>> {
        let mut conn = self.conn()?;
        let rows = clients::table
            .filter(clients::cpf.eq(cpf.as_str()))
            .order_by(clients::id.asc())
            .limit(2)
            .load::<DbClient>(&mut conn)?;

        first_of("by cpf", rows)
    }

    fn find_clients_by_cpf_like(&self, pattern: &str) -> RepositoryResult<Vec<Client>> {
        let mut conn = self.conn()?;
        load_list(
            &mut conn,
            clients::table
                .filter(clients::cpf.like(pattern.to_string()))
                .into_boxed(),
        )
    }

    fn page_clients_by_cpf_like(
        &self,
        pattern: &str,
        page: &PageRequest,
    ) -> RepositoryResult<Page<Client>> {
        let mut conn = self.conn()?;
        load_page(
            &mut conn,
            || {
                clients::table
                    .filter(clients::cpf.like(pattern.to_string()))
                    .into_boxed()
            },
            page,
        )
    }

    fn find_clients_by_cpf_containing(&self, part: &str) -> RepositoryResult<Vec<Client>> {
        let mut conn = self.conn()?;
        let pattern = format!("%{}%", escape_like(part));
        load_list(
            &mut conn,
            clients::table
                .filter(clients::cpf.like(pattern).escape('\\'))
                .into_boxed(),
        )
    }

    fn page_clients_by_cpf_starting_with(
        &self,
        prefix: &str,
        page: &PageRequest,
    ) -> RepositoryResult<Page<Client>> {
        let mut conn = self.conn()?;
        let pattern = format!("{}%", escape_like(prefix));
        load_page(
            &mut conn,
            || {
                clients::table
                    .filter(clients::cpf.like(pattern.clone()).escape('\\'))
                    .into_boxed()
            },
            page,
        )
    }

    fn find_clients_by_name_containing(&self, text: &str) -> RepositoryResult<Vec<Client>> {
        let mut conn = self.conn()?;
        let pattern = format!("%{}%", escape_like(&fold_case_str(text)));
        load_list(
            &mut conn,
            clients::table
                .filter(fold_case(clients::name).like(pattern).escape('\\'))
                .into_boxed(),
        )
    }

    fn find_client_by_name(&self, name: &str) -> RepositoryResult<Option<Client>> {
        let mut conn = self.conn()?;
        let rows = name_equals(name)
            .order_by(clients::id.asc())
            .limit(2)
            .load::<DbClient>(&mut conn)?;

        first_of("by name", rows)
    }

    fn get_client_by_name(&self, name: &str) -> RepositoryResult<Client> {
        let mut conn = self.conn()?;
        let mut rows = name_equals(name)
            .order_by(clients::id.asc())
            .load::<DbClient>(&mut conn)?;

        match rows.len() {
            0 => Err(RepositoryError::NotFound),
            1 => Client::try_from(rows.remove(0)).map_err(RepositoryError::from),
            n => Err(RepositoryError::NonUniqueResult(n)),
        }
    }

    fn find_clients_with_income_at_least(&self, income: f64) -> RepositoryResult<Vec<Client>> {
        let mut conn = self.conn()?;
        load_list(
            &mut conn,
            clients::table.filter(clients::income.ge(income)).into_boxed(),
        )
    }

    fn find_clients_with_income_at_most(&self, income: f64) -> RepositoryResult<Vec<Client>> {
        let mut conn = self.conn()?;
        load_list(
            &mut conn,
            clients::table.filter(clients::income.le(income)).into_boxed(),
        )
    }

    fn find_clients_with_income_less_than(&self, income: f64) -> RepositoryResult<Vec<Client>> {
        let mut conn = self.conn()?;
        load_list(
            &mut conn,
            clients::table.filter(clients::income.lt(income)).into_boxed(),
        )
    }

    fn find_clients_with_income_between(
        &self,
        min: f64,
        max: f64,
    ) -> RepositoryResult<Vec<Client>> {
        let mut conn = self.conn()?;
        load_list(
            &mut conn,
            clients::table
                .filter(clients::income.between(min, max))
                .into_boxed(),
        )
    }

    fn find_clients_with_income_greater_than(
        &self,
        income: f64,
    ) -> RepositoryResult<Vec<Client>> {
        let mut conn = self.conn()?;
        load_list(
            &mut conn,
            clients::table.filter(clients::income.gt(income)).into_boxed(),
        )
    }

    fn page_clients_with_income_greater_than(
        &self,
        income: f64,
        page: &PageRequest,
    ) -> RepositoryResult<Page<Client>> {
        let mut conn = self.conn()?;
        load_page(
            &mut conn,
            || clients::table.filter(clients::income.gt(income)).into_boxed(),
            page,
        )
    }

    fn page_clients_by_income(
        &self,
        income: f64,
        page: &PageRequest,
    ) -> RepositoryResult<Page<Client>> {
        let mut conn = self.conn()?;
        load_page(
            &mut conn,
            || clients::table.filter(clients::income.eq(income)).into_boxed(),
            page,
        )
    }

    fn find_clients_born_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepositoryResult<Vec<Client>> {
        let mut conn = self.conn()?;
        load_list(
            &mut conn,
            clients::table
                .filter(
                    clients::birth_date.between(start.naive_utc(), end.naive_utc()),
                )
                .into_boxed(),
        )
    }

    fn find_clients_with_children_at_least(
        &self,
        children: ChildrenCount,
    ) -> RepositoryResult<Vec<Client>> {
        let mut conn = self.conn()?;
        let rows = clients::table
            .filter(clients::children.ge(children.get()))
            .order_by((clients::name.asc(), clients::id.asc()))
            .load::<DbClient>(&mut conn)?;

        into_domain(rows)
    }
}

impl ClientWriter for DieselRepository {
    fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client> {
        let mut conn = self.conn()?;
        let db_new_client: DbNewClient = new_client.into();

        let db_client = diesel::insert_into(clients::table)
            .values(&db_new_client)
            .get_result::<DbClient>(&mut conn)?;

        Client::try_from(db_client).map_err(RepositoryError::from)
    }

    fn create_clients(&self, new_clients: &[NewClient]) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        let insertables: Vec<DbNewClient> = new_clients.iter().map(Into::into).collect();

        let affected = diesel::insert_into(clients::table)
            .values(&insertables)
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn update_client(
        &self,
        client_id: ClientId,
        updates: &UpdateClient,
    ) -> RepositoryResult<Client> {
        let mut conn = self.conn()?;
        let db_updates: DbUpdateClient = updates.into();

        // IMMEDIATE takes the write lock before the existence check.
        let updated = conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            clients::table
                .find(client_id.get())
                .select(clients::id)
                .first::<i32>(conn)
                .optional()?
                .ok_or(RepositoryError::NotFound)?;

            let updated = diesel::update(clients::table.find(client_id.get()))
                .set(&db_updates)
                .get_result::<DbClient>(conn)?;

            Ok(updated)
        })?;

        Client::try_from(updated).map_err(RepositoryError::from)
    }

    fn delete_client(&self, client_id: ClientId) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        let affected = diesel::delete(clients::table.find(client_id.get())).execute(&mut conn)?;
        Ok(affected)
    }

    fn delete_clients_by_cpf(&self, cpf: &Cpf) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        let affected = diesel::delete(clients::table.filter(clients::cpf.eq(cpf.as_str())))
            .execute(&mut conn)?;
        Ok(affected)
    }

    fn delete_clients_with_income_greater_than(&self, income: f64) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        let affected = diesel::delete(clients::table.filter(clients::income.gt(income)))
            .execute(&mut conn)?;
        Ok(affected)
    }
}
