pub mod assert;
pub mod init;

use crate::DbPool;
use actix_web::web;
use anyhow::Context;
use diesel::prelude::*;
use diesel::r2d2::ConnectionManager;
use diesel::SqliteConnection;
use r2d2::PooledConnection;

pub fn get_db_conn(
    pool: &web::Data<DbPool>,
) -> anyhow::Result<PooledConnection<ConnectionManager<SqliteConnection>>> {
    pool.get().context("Lỗi kết nối cơ sở dữ liệu")
}

/// Rowid of the most recent insert on this connection. Must be called inside
/// the same transaction as the insert it refers to.
pub fn last_insert_rowid(conn: &SqliteConnection) -> anyhow::Result<i64> {
    diesel::select(diesel::dsl::sql::<diesel::sql_types::BigInt>(
        "last_insert_rowid()",
    ))
    .get_result::<i64>(conn)
    .context("Lỗi cơ sở dữ liệu")
}

#[cfg(test)]
pub fn test_pool() -> DbPool {
    // One shared in-memory connection; a wider pool would give each checkout
    // its own empty database.
    let manager = ConnectionManager::<SqliteConnection>::new(":memory:");
    let pool = r2d2::Pool::builder()
        .max_size(1)
        .build(manager)
        .expect("test pool");
    init::init_schema(&pool.get().expect("test conn")).expect("test schema");
    pool
}
