#[macro_export]
macro_rules! post_funcs {
    ( $( ( $func_name:ident, $url:expr, $request:ty, $response:ty ) ),+ $(,)? ) => {
        $(
            paste::paste! {
                #[post($url)]
                async fn $func_name(
                    pool: web::Data<DbPool>,
                    events: web::Data<crate::events::EventBus>,
                    info: web::Json<$request>
                ) -> impl Responder {
                    let response = match [<$func_name _impl>](pool, events, info).await {
                        Ok(response) => response,
                        Err(err) => {
                            tracing::warn!(endpoint = $url, error = %err, "request failed");
                            $response::err(err.to_string())
                        }
                    };
                    HttpResponse::Ok().json(response)
                }
            }
        )+
    };
}

use anyhow::bail;
use chrono::NaiveDateTime;

use crate::models::accounts::ROLES;
use crate::models::appointments::VISIT_TYPES;

pub fn assert_visit_type(visit_type: &str) -> anyhow::Result<()> {
    if !VISIT_TYPES.contains(&visit_type) {
        bail!("Loại khám không hợp lệ");
    }
    Ok(())
}

pub fn assert_role(role: &str) -> anyhow::Result<()> {
    if !ROLES.contains(&role) {
        bail!("Vai trò không hợp lệ");
    }
    Ok(())
}

pub fn format_time_str(time: &NaiveDateTime) -> String {
    const TIME_FMT: &str = "%Y-%m-%dT%H:%M:%S";

    format!("{}", time.format(TIME_FMT))
}

pub fn get_str_pattern<S: AsRef<str>>(s: S) -> String {
    format!("%{}%", s.as_ref())
}

pub fn get_str_pattern_opt<S: AsRef<str>>(s: Option<S>) -> String {
    match s {
        Some(s) => get_str_pattern(s),
        None => "%".to_string(),
    }
}

pub fn generate_login_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn str_pattern_wraps_keyword() {
        assert_eq!(get_str_pattern("an"), "%an%");
        assert_eq!(get_str_pattern_opt::<String>(None), "%");
    }

    #[test]
    fn visit_type_must_be_in_fixed_set() {
        assert!(assert_visit_type("Tái khám").is_ok());
        assert!(assert_visit_type("Khám mới").is_ok());
        assert!(assert_visit_type("khám lạ").is_err());
    }

    #[test]
    fn role_must_be_in_fixed_set() {
        assert!(assert_role("Quản trị").is_ok());
        assert!(assert_role("Bác sĩ").is_ok());
        assert!(assert_role("Giám đốc").is_err());
    }

    #[test]
    fn login_tokens_are_unique() {
        assert_ne!(generate_login_token(), generate_login_token());
    }
}
