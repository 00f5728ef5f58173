mod requests;
mod responses;
pub(crate) mod utils;

use crate::{
    database::get_db_conn,
    events::{AppEvent, EventBus},
    models::{
        account_logins::AccountLoginData,
        accounts::{is_staff_role, AccountData, NewAccount, ROLE_ADMIN},
        staff::NewStaff,
    },
    password::{hash_password, verify_password},
    protocol::SimpleResponse,
    DbPool,
};
use actix_web::{post, web, HttpResponse, Responder};
use anyhow::{bail, Context};
use chrono::Utc;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;

use self::{requests::*, responses::*, utils::get_username_from_token};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(login)
        .service(logout)
        .service(create)
        .service(edit)
        .service(delete)
        .service(change_password)
        .service(list);
}

crate::post_funcs! {
    (login, "/login", LoginRequest, LoginResponse),
    (logout, "/logout", LogoutRequest, SimpleResponse),
    (create, "/create", CreateRequest, SimpleResponse),
    (edit, "/edit", EditRequest, SimpleResponse),
    (delete, "/delete", DeleteRequest, SimpleResponse),
    (change_password, "/change_password", ChangePasswordRequest, SimpleResponse),
    (list, "/list", ListRequest, ListResponse),
}

async fn login_impl(
    pool: web::Data<DbPool>,
    _events: web::Data<EventBus>,
    info: web::Json<LoginRequest>,
) -> anyhow::Result<LoginResponse> {
    use crate::schema::{account_logins, accounts};

    let info = info.into_inner();
    let conn = get_db_conn(&pool)?;
    let login_token = web::block(move || {
        let account = accounts::table
            .filter(accounts::username.eq(&info.username))
            .get_result::<AccountData>(&conn)
            .optional()
            .context("Lỗi cơ sở dữ liệu")?;
        let account = match account {
            Some(account) if verify_password(&info.password, &account.password) => account,
            _ => bail!("Sai tên đăng nhập hoặc mật khẩu"),
        };

        let login_token = crate::utils::generate_login_token();
        let token_data = AccountLoginData {
            token: login_token.clone(),
            username: account.username,
            login_time: Utc::now().naive_utc(),
        };
        diesel::insert_into(account_logins::table)
            .values(token_data)
            .execute(&conn)
            .context("Lỗi cơ sở dữ liệu")?;

        Ok(login_token)
    })
    .await?;

    Ok(LoginResponse {
        success: true,
        err: "".to_string(),
        login_token,
    })
}

async fn logout_impl(
    pool: web::Data<DbPool>,
    _events: web::Data<EventBus>,
    info: web::Json<LogoutRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::account_logins;

    let info = info.into_inner();
    let conn = get_db_conn(&pool)?;
    web::block(move || {
        diesel::delete(account_logins::table.filter(account_logins::token.eq(info.login_token)))
            .execute(&conn)
    })
    .await
    .context("Lỗi cơ sở dữ liệu")?;

    Ok(SimpleResponse::ok())
}

async fn create_impl(
    pool: web::Data<DbPool>,
    events: web::Data<EventBus>,
    info: web::Json<CreateRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::accounts;

    let info = info.into_inner();
    // All validation happens before anything touches the database.
    if info.username.chars().count() < 3 {
        bail!("Tên đăng nhập phải có ít nhất 3 ký tự");
    }
    if info.password.chars().count() < 6 {
        bail!("Mật khẩu phải có ít nhất 6 ký tự");
    }
    if info.full_name.trim().is_empty() {
        bail!("Họ tên không được để trống");
    }
    crate::utils::assert_role(&info.role)?;

    get_username_from_token(info.login_token.clone(), &pool).await?;

    let conn = get_db_conn(&pool)?;
    let username = info.username.clone();
    web::block(move || {
        conn.transaction(|| {
            // Staff-like roles own a staff row, linked by surrogate id.
            let staff_id = if is_staff_role(&info.role) {
                let data = NewStaff {
                    name: info.full_name.clone(),
                    role: info.role.clone(),
                    telephone: "".to_string(),
                };
                diesel::insert_into(crate::schema::staff::table)
                    .values(data)
                    .execute(&conn)
                    .context("Lỗi cơ sở dữ liệu")?;
                Some(crate::database::last_insert_rowid(&conn)?)
            } else {
                None
            };

            let data = NewAccount {
                username: info.username,
                password: hash_password(&info.password),
                full_name: info.full_name,
                role: info.role,
                staff_id,
            };
            // Uniqueness is the primary-key constraint, checked atomically at
            // write time rather than by a prior read.
            match diesel::insert_into(accounts::table).values(data).execute(&conn) {
                Ok(_) => {}
                Err(diesel::result::Error::DatabaseError(
                    DatabaseErrorKind::UniqueViolation,
                    _,
                )) => bail!("Tên đăng nhập đã tồn tại"),
                Err(err) => return Err(err).context("Lỗi cơ sở dữ liệu"),
            }

            Ok(())
        })
    })
    .await?;

    events.emit(AppEvent::UserCreated { username });
    events.emit(AppEvent::DataChanged);
    Ok(SimpleResponse::ok())
}

async fn edit_impl(
    pool: web::Data<DbPool>,
    events: web::Data<EventBus>,
    info: web::Json<EditRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::{accounts, staff};

    let info = info.into_inner();
    if info.full_name.trim().is_empty() {
        bail!("Họ tên không được để trống");
    }
    crate::utils::assert_role(&info.role)?;

    get_username_from_token(info.login_token.clone(), &pool).await?;

    let conn = get_db_conn(&pool)?;
    web::block(move || {
        conn.transaction(|| {
            let account = accounts::table
                .filter(accounts::username.eq(&info.username))
                .get_result::<AccountData>(&conn)
                .optional()
                .context("Lỗi cơ sở dữ liệu")?;
            let account = match account {
                Some(account) => account,
                None => bail!("Không tìm thấy tài khoản"),
            };

            let staff_id = match (account.staff_id, is_staff_role(&info.role)) {
                (Some(sid), true) => {
                    diesel::update(staff::table.filter(staff::id.eq(sid)))
                        .set((
                            staff::name.eq(&info.full_name),
                            staff::role.eq(&info.role),
                        ))
                        .execute(&conn)
                        .context("Lỗi cơ sở dữ liệu")?;
                    Some(sid)
                }
                (Some(sid), false) => {
                    diesel::delete(staff::table.filter(staff::id.eq(sid)))
                        .execute(&conn)
                        .context("Lỗi cơ sở dữ liệu")?;
                    None
                }
                (None, true) => {
                    let data = NewStaff {
                        name: info.full_name.clone(),
                        role: info.role.clone(),
                        telephone: "".to_string(),
                    };
                    diesel::insert_into(staff::table)
                        .values(data)
                        .execute(&conn)
                        .context("Lỗi cơ sở dữ liệu")?;
                    Some(crate::database::last_insert_rowid(&conn)?)
                }
                (None, false) => None,
            };

            diesel::update(accounts::table.filter(accounts::username.eq(&info.username)))
                .set((
                    accounts::full_name.eq(&info.full_name),
                    accounts::role.eq(&info.role),
                    accounts::staff_id.eq(staff_id),
                ))
                .execute(&conn)
                .context("Lỗi cơ sở dữ liệu")?;

            Ok(())
        })
    })
    .await?;

    events.emit(AppEvent::DataChanged);
    Ok(SimpleResponse::ok())
}

async fn delete_impl(
    pool: web::Data<DbPool>,
    events: web::Data<EventBus>,
    info: web::Json<DeleteRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::{account_logins, accounts, staff};

    let info = info.into_inner();
    let operator = get_username_from_token(info.login_token.clone(), &pool).await?;

    let conn = get_db_conn(&pool)?;
    // Guards and the delete live in one transaction, so two concurrent
    // deletes cannot both pass the last-admin count.
    web::block(move || {
        conn.transaction(|| {
            if info.username == operator {
                bail!("Không thể xóa tài khoản đang đăng nhập");
            }

            let account = accounts::table
                .filter(accounts::username.eq(&info.username))
                .get_result::<AccountData>(&conn)
                .optional()
                .context("Lỗi cơ sở dữ liệu")?;
            let account = match account {
                Some(account) => account,
                None => bail!("Không tìm thấy tài khoản"),
            };

            if account.role == ROLE_ADMIN {
                let admins = accounts::table
                    .filter(accounts::role.eq(ROLE_ADMIN))
                    .count()
                    .get_result::<i64>(&conn)
                    .context("Lỗi cơ sở dữ liệu")?;
                if admins <= 1 {
                    bail!("Không thể xóa quản trị viên cuối cùng");
                }
            }

            if let Some(sid) = account.staff_id {
                diesel::delete(staff::table.filter(staff::id.eq(sid)))
                    .execute(&conn)
                    .context("Lỗi cơ sở dữ liệu")?;
            }
            diesel::delete(
                account_logins::table.filter(account_logins::username.eq(&info.username)),
            )
            .execute(&conn)
            .context("Lỗi cơ sở dữ liệu")?;
            diesel::delete(accounts::table.filter(accounts::username.eq(&info.username)))
                .execute(&conn)
                .context("Lỗi cơ sở dữ liệu")?;

            Ok(())
        })
    })
    .await?;

    events.emit(AppEvent::DataChanged);
    Ok(SimpleResponse::ok())
}

async fn change_password_impl(
    pool: web::Data<DbPool>,
    _events: web::Data<EventBus>,
    info: web::Json<ChangePasswordRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::accounts;

    let info = info.into_inner();
    if info.password_new.chars().count() < 6 {
        bail!("Mật khẩu phải có ít nhất 6 ký tự");
    }

    get_username_from_token(info.login_token.clone(), &pool).await?;
    crate::database::assert::assert_account(&pool, info.username.clone()).await?;

    let conn = get_db_conn(&pool)?;
    web::block(move || {
        let hashed = hash_password(&info.password_new);
        diesel::update(accounts::table.filter(accounts::username.eq(&info.username)))
            .set(accounts::password.eq(hashed))
            .execute(&conn)
    })
    .await
    .context("Lỗi cơ sở dữ liệu")?;

    Ok(SimpleResponse::ok())
}

async fn list_impl(
    pool: web::Data<DbPool>,
    _events: web::Data<EventBus>,
    info: web::Json<ListRequest>,
) -> anyhow::Result<ListResponse> {
    use crate::schema::accounts;

    let info = info.into_inner();
    get_username_from_token(info.login_token, &pool).await?;

    let conn = get_db_conn(&pool)?;
    let items = web::block(move || {
        accounts::table
            .order(accounts::username.asc())
            .get_results::<AccountData>(&conn)
    })
    .await
    .context("Lỗi cơ sở dữ liệu")?;

    let items = items
        .into_iter()
        .map(|data| AccountItem {
            username: data.username,
            full_name: data.full_name,
            role: data.role,
            staff_id: data.staff_id,
        })
        .collect();

    Ok(ListResponse {
        success: true,
        err: "".to_string(),
        accounts: items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::accounts::{ROLE_DOCTOR, ROLE_RECEPTIONIST};
    use crate::models::staff::StaffData;
    use crate::schema::{account_logins, accounts, staff};

    fn setup() -> (web::Data<DbPool>, web::Data<EventBus>) {
        (
            web::Data::new(crate::database::test_pool()),
            web::Data::new(EventBus::new()),
        )
    }

    fn seed_account(pool: &web::Data<DbPool>, username: &str, role: &str) {
        let conn = pool.get().unwrap();
        diesel::insert_into(accounts::table)
            .values(NewAccount {
                username: username.to_string(),
                password: "x".to_string(),
                full_name: username.to_string(),
                role: role.to_string(),
                staff_id: None,
            })
            .execute(&conn)
            .unwrap();
    }

    fn seed_login(pool: &web::Data<DbPool>, username: &str) -> String {
        let conn = pool.get().unwrap();
        let token = format!("token-{}", username);
        diesel::insert_into(account_logins::table)
            .values(AccountLoginData {
                token: token.clone(),
                username: username.to_string(),
                login_time: Utc::now().naive_utc(),
            })
            .execute(&conn)
            .unwrap();
        token
    }

    fn account_count(pool: &web::Data<DbPool>) -> i64 {
        let conn = pool.get().unwrap();
        accounts::table.count().get_result::<i64>(&conn).unwrap()
    }

    #[actix_rt::test]
    async fn short_username_is_rejected_before_any_write() {
        let (pool, events) = setup();
        seed_account(&pool, "admin", ROLE_ADMIN);
        let token = seed_login(&pool, "admin");
        let before = account_count(&pool);

        let res = create_impl(
            pool.clone(),
            events,
            web::Json(CreateRequest {
                login_token: token,
                username: "ab".to_string(),
                password: "matkhau1".to_string(),
                full_name: "Ai Đó".to_string(),
                role: ROLE_RECEPTIONIST.to_string(),
            }),
        )
        .await;

        assert!(res.is_err());
        assert_eq!(account_count(&pool), before);
    }

    #[actix_rt::test]
    async fn duplicate_username_maps_to_a_user_message() {
        let (pool, events) = setup();
        seed_account(&pool, "admin", ROLE_ADMIN);
        let token = seed_login(&pool, "admin");

        let request = || CreateRequest {
            login_token: "token-admin".to_string(),
            username: "letan01".to_string(),
            password: "matkhau1".to_string(),
            full_name: "Lễ Tân Một".to_string(),
            role: ROLE_RECEPTIONIST.to_string(),
        };
        create_impl(pool.clone(), events.clone(), web::Json(request()))
            .await
            .unwrap();
        let err = create_impl(pool.clone(), events, web::Json(request()))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("đã tồn tại"), "{}", err);
        let _ = token;
    }

    #[actix_rt::test]
    async fn staff_role_owns_a_linked_staff_row() {
        let (pool, events) = setup();
        seed_account(&pool, "admin", ROLE_ADMIN);
        let token = seed_login(&pool, "admin");

        create_impl(
            pool.clone(),
            events.clone(),
            web::Json(CreateRequest {
                login_token: token.clone(),
                username: "bacsi01".to_string(),
                password: "matkhau1".to_string(),
                full_name: "Trần Văn Bình".to_string(),
                role: ROLE_DOCTOR.to_string(),
            }),
        )
        .await
        .unwrap();

        let conn = pool.get().unwrap();
        let account = accounts::table
            .filter(accounts::username.eq("bacsi01"))
            .get_result::<AccountData>(&conn)
            .unwrap();
        let sid = account.staff_id.expect("staff link");
        let row = staff::table
            .filter(staff::id.eq(sid))
            .get_result::<StaffData>(&conn)
            .unwrap();
        assert_eq!(row.name, "Trần Văn Bình");
        assert_eq!(row.role, ROLE_DOCTOR);
        drop(conn);

        // Moving the role out of the staff subset drops the row again.
        edit_impl(
            pool.clone(),
            events,
            web::Json(EditRequest {
                login_token: token,
                username: "bacsi01".to_string(),
                full_name: "Trần Văn Bình".to_string(),
                role: ROLE_ADMIN.to_string(),
            }),
        )
        .await
        .unwrap();

        let conn = pool.get().unwrap();
        let account = accounts::table
            .filter(accounts::username.eq("bacsi01"))
            .get_result::<AccountData>(&conn)
            .unwrap();
        assert!(account.staff_id.is_none());
        let remaining = staff::table
            .filter(staff::id.eq(sid))
            .count()
            .get_result::<i64>(&conn)
            .unwrap();
        assert_eq!(remaining, 0);
    }

    #[actix_rt::test]
    async fn deleting_the_sole_admin_is_rejected() {
        let (pool, events) = setup();
        seed_account(&pool, "admin", ROLE_ADMIN);
        seed_account(&pool, "letan01", ROLE_RECEPTIONIST);
        let token = seed_login(&pool, "letan01");

        let err = delete_impl(
            pool.clone(),
            events,
            web::Json(DeleteRequest {
                login_token: token,
                username: "admin".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("cuối cùng"), "{}", err);
        assert_eq!(account_count(&pool), 2);
    }

    #[actix_rt::test]
    async fn deleting_a_non_sole_admin_succeeds() {
        let (pool, events) = setup();
        seed_account(&pool, "admin", ROLE_ADMIN);
        seed_account(&pool, "admin2", ROLE_ADMIN);
        let token = seed_login(&pool, "admin");

        delete_impl(
            pool.clone(),
            events,
            web::Json(DeleteRequest {
                login_token: token,
                username: "admin2".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(account_count(&pool), 1);
    }

    #[actix_rt::test]
    async fn deleting_the_logged_in_account_is_rejected() {
        let (pool, events) = setup();
        seed_account(&pool, "admin", ROLE_ADMIN);
        seed_account(&pool, "admin2", ROLE_ADMIN);
        let token = seed_login(&pool, "admin");

        let err = delete_impl(
            pool.clone(),
            events,
            web::Json(DeleteRequest {
                login_token: token,
                username: "admin".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("đang đăng nhập"), "{}", err);
    }

    #[actix_rt::test]
    async fn created_accounts_can_log_in() {
        let (pool, events) = setup();
        seed_account(&pool, "admin", ROLE_ADMIN);
        let token = seed_login(&pool, "admin");

        create_impl(
            pool.clone(),
            events.clone(),
            web::Json(CreateRequest {
                login_token: token,
                username: "yta01".to_string(),
                password: "matkhau1".to_string(),
                full_name: "Phạm Thị Yến".to_string(),
                role: crate::models::accounts::ROLE_NURSE.to_string(),
            }),
        )
        .await
        .unwrap();

        let res = login_impl(
            pool.clone(),
            events.clone(),
            web::Json(LoginRequest {
                username: "yta01".to_string(),
                password: "matkhau1".to_string(),
            }),
        )
        .await
        .unwrap();
        assert!(res.success);
        assert!(!res.login_token.is_empty());

        let err = login_impl(
            pool,
            events,
            web::Json(LoginRequest {
                username: "yta01".to_string(),
                password: "matkhau2".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("Sai tên đăng nhập"), "{}", err);
    }

    #[actix_rt::test]
    async fn change_password_rehashes_and_overwrites() {
        let (pool, events) = setup();
        seed_account(&pool, "admin", ROLE_ADMIN);
        let token = seed_login(&pool, "admin");

        change_password_impl(
            pool.clone(),
            events.clone(),
            web::Json(ChangePasswordRequest {
                login_token: token,
                username: "admin".to_string(),
                password_new: "matkhaumoi".to_string(),
            }),
        )
        .await
        .unwrap();

        let res = login_impl(
            pool,
            events,
            web::Json(LoginRequest {
                username: "admin".to_string(),
                password: "matkhaumoi".to_string(),
            }),
        )
        .await
        .unwrap();
        assert!(res.success);
    }

    #[actix_rt::test]
    async fn expired_sessions_are_rejected() {
        let (pool, _events) = setup();
        seed_account(&pool, "admin", ROLE_ADMIN);
        let conn = pool.get().unwrap();
        diesel::insert_into(account_logins::table)
            .values(AccountLoginData {
                token: "token-old".to_string(),
                username: "admin".to_string(),
                login_time: Utc::now().naive_utc() - chrono::Duration::hours(2),
            })
            .execute(&conn)
            .unwrap();
        drop(conn);

        let err = get_username_from_token("token-old".to_string(), &pool)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("hết hạn"), "{}", err);
    }
}
