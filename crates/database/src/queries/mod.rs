use std::fmt::Write as _;

use pipeline::database::DatabaseError;
use sqlx::{
    postgres::{PgArguments, PgQueryResult},
    query::Query,
    Executor, Postgres,
};

pub mod network;
pub mod schema;
pub mod station;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const DUPLICATE_TABLE: &str = "42P07";

pub(crate) fn convert_error(why: sqlx::Error) -> DatabaseError {
    match why {
        sqlx::Error::RowNotFound => DatabaseError::NotFound,
        sqlx::Error::Database(db) => {
            let code = db.code().map(|code| code.into_owned());
            match code.as_deref() {
                Some(UNIQUE_VIOLATION) | Some(FOREIGN_KEY_VIOLATION) => {
                    DatabaseError::Constraint(db.message().to_owned())
                }
                Some(DUPLICATE_TABLE) => {
                    DatabaseError::AlreadyExists(db.message().to_owned())
                }
                _ => DatabaseError::Other(Box::new(sqlx::Error::Database(db))),
            }
        }
        _ => DatabaseError::Other(Box::new(why)),
    }
}

// bulk insert

/// `INSERT INTO table (columns) VALUES ($1, ..), (..), ..` for `rows` rows.
/// There is no conflict clause, an existing key fails the statement.
pub fn insert_statement(table: &str, columns: &[&str], rows: usize) -> String {
    let mut query_str = format!("INSERT INTO {} ({}) VALUES ", table, columns.join(", "));
    let mut placeholder_index = 1;
    for i in 0..rows {
        if i > 0 {
            query_str.push_str(", ");
        }
        query_str.push('(');
        for j in 0..columns.len() {
            if j > 0 {
                query_str.push_str(", ");
            }
            let _ = write!(&mut query_str, "${}", placeholder_index);
            placeholder_index += 1;
        }
        query_str.push(')');
    }
    query_str.push(';');
    query_str
}

pub async fn insert_all<'c, E, T, B>(
    executor: E,
    table: &str,
    columns: &[&str],
    values: &[T],
    bind: B,
) -> Result<u64, sqlx::Error>
where
    E: Executor<'c, Database = Postgres>,
    for<'a> B:
        Fn(Query<'a, Postgres, PgArguments>, &T) -> Query<'a, Postgres, PgArguments>,
{
    if values.is_empty() {
        return Ok(0);
    }

    let query_str = insert_statement(table, columns, values.len());

    let mut query = sqlx::query::<Postgres>(&query_str);
    for value in values {
        query = bind(query, value);
    }
    query
        .execute(executor)
        .await
        .map(|result: PgQueryResult| result.rows_affected())
}
