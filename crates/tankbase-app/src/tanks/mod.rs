pub mod render;

use axum::{
    response::{Html, IntoResponse},
    Form,
};
use serde::Deserialize;
use tankbase_dal::tank::{CreateTank, TankRepository};
use tracing::debug;

use crate::error::ApiResult;
use crate::repository_from_request;

repository_from_request!(TankRepository);

pub const NATIONS: &[&str] = &[
    "USSR/Russia",
    "USA",
    "Germany",
    "UK",
    "France",
    "China",
    "Japan",
    "Other",
];
pub const CLASSES: &[&str] = &["MBT", "Light", "Medium", "Heavy", "SPG", "TD"];

pub const DEFAULT_NATION: &str = "Other";
pub const DEFAULT_CLASS: &str = "MBT";

pub const NOTICE_CREATED: &str = "Танк добавлен.";
pub const NOTICE_UPDATED: &str = "Запись обновлена.";
pub const NOTICE_DELETED: &str = "Запись удалена.";

/// Raw url-encoded submission; every field may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TankForm {
    pub action: Option<String>,
    pub id: Option<String>,
    pub name: Option<String>,
    pub nation: Option<String>,
    pub class: Option<String>,
    pub year: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Название обязательно.")]
    NameRequired,
}

/// Outcome of the mutation step. A notice is only produced on a path that had
/// no validation errors, so at most one of the two is ever rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    None,
    Notice(&'static str),
    Errors(Vec<ValidationError>),
}

/// Missing form value becomes an empty string, surrounding whitespace is
/// dropped.
fn text_field(value: Option<&str>) -> String {
    value.unwrap_or_default().trim().to_string()
}

/// Id of the targeted record; missing or unparseable input maps to 0, which
/// matches no real row.
fn record_id(value: Option<&str>) -> i64 {
    value.unwrap_or_default().trim().parse().unwrap_or(0)
}

/// Empty input means no year at all; non-numeric input falls back to 0.
fn year_field(value: Option<&str>) -> Option<i64> {
    let text = value.unwrap_or_default().trim();
    if text.is_empty() {
        None
    } else {
        Some(text.parse().unwrap_or(0))
    }
}

impl TankForm {
    pub fn record_id(&self) -> i64 {
        record_id(self.id.as_deref())
    }

    pub fn payload(&self) -> CreateTank {
        let nation = text_field(self.nation.as_deref());
        let class = text_field(self.class.as_deref());
        let description = text_field(self.description.as_deref());
        CreateTank {
            name: text_field(self.name.as_deref()),
            nation: if nation.is_empty() {
                DEFAULT_NATION.to_string()
            } else {
                nation
            },
            class: if class.is_empty() {
                DEFAULT_CLASS.to_string()
            } else {
                class
            },
            year: year_field(self.year.as_deref()),
            description: if description.is_empty() {
                None
            } else {
                Some(description)
            },
        }
    }
}

pub fn validate(payload: &CreateTank) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if payload.name.is_empty() {
        errors.push(ValidationError::NameRequired);
    }
    errors
}

/// Applies at most one mutation based on the submitted action and reports
/// what happened. Persistence failures propagate to the caller.
pub async fn apply(
    repository: &TankRepository,
    form: &TankForm,
) -> Result<Feedback, tankbase_dal::Error> {
    match form.action.as_deref().unwrap_or_default() {
        "create" => {
            let payload = form.payload();
            let errors = validate(&payload);
            if !errors.is_empty() {
                return Ok(Feedback::Errors(errors));
            }
            repository.create(payload).await?;
            Ok(Feedback::Notice(NOTICE_CREATED))
        }
        "update" => {
            let payload = form.payload();
            let errors = validate(&payload);
            if !errors.is_empty() {
                return Ok(Feedback::Errors(errors));
            }
            repository.update(form.record_id(), payload).await?;
            Ok(Feedback::Notice(NOTICE_UPDATED))
        }
        "delete" => {
            repository.delete(form.record_id()).await?;
            Ok(Feedback::Notice(NOTICE_DELETED))
        }
        other => {
            if !other.is_empty() {
                debug!("Ignoring unknown action {:?}", other);
            }
            Ok(Feedback::None)
        }
    }
}

async fn render_current(
    repository: &TankRepository,
    feedback: Feedback,
) -> ApiResult<Html<String>> {
    let tanks = repository.list_all().await?;
    Ok(Html(render::page(&feedback, &tanks)))
}

pub async fn show(repository: TankRepository) -> ApiResult<impl IntoResponse> {
    render_current(&repository, Feedback::None).await
}

pub async fn submit(
    repository: TankRepository,
    Form(form): Form<TankForm>,
) -> ApiResult<impl IntoResponse> {
    let feedback = apply(&repository, &form).await?;
    render_current(&repository, feedback).await
}

pub fn router() -> axum::Router<crate::state::AppState> {
    use axum::routing::get;
    axum::Router::new().route("/", get(show).post(submit))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> TankForm {
        let mut form = TankForm::default();
        for (key, value) in pairs {
            let value = Some(value.to_string());
            match *key {
                "action" => form.action = value,
                "id" => form.id = value,
                "name" => form.name = value,
                "nation" => form.nation = value,
                "class" => form.class = value,
                "year" => form.year = value,
                "description" => form.description = value,
                other => panic!("unknown field {}", other),
            }
        }
        form
    }

    async fn test_repository() -> TankRepository {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        tankbase_dal::ensure_schema(&pool).await.unwrap();
        TankRepository::new(pool)
    }

    #[test]
    fn test_text_field_trims_and_defaults() {
        assert_eq!(text_field(None), "");
        assert_eq!(text_field(Some("  T-90M  ")), "T-90M");
        assert_eq!(text_field(Some("   ")), "");
    }

    #[test]
    fn test_record_id_fallback() {
        assert_eq!(record_id(None), 0);
        assert_eq!(record_id(Some("")), 0);
        assert_eq!(record_id(Some("abc")), 0);
        assert_eq!(record_id(Some(" 42 ")), 42);
    }

    #[test]
    fn test_year_field() {
        assert_eq!(year_field(None), None);
        assert_eq!(year_field(Some("  ")), None);
        assert_eq!(year_field(Some("2020")), Some(2020));
        assert_eq!(year_field(Some("soon")), Some(0));
    }

    #[test]
    fn test_payload_defaults() {
        let payload = form(&[("name", "Maus"), ("nation", " "), ("class", "")]).payload();
        assert_eq!(payload.nation, DEFAULT_NATION);
        assert_eq!(payload.class, DEFAULT_CLASS);
        assert_eq!(payload.year, None);
        assert_eq!(payload.description, None);
    }

    #[test]
    fn test_validate_collects_empty_name() {
        let payload = form(&[("name", "   ")]).payload();
        assert_eq!(validate(&payload), vec![ValidationError::NameRequired]);

        let payload = form(&[("name", "T-72")]).payload();
        assert!(validate(&payload).is_empty());
    }

    #[tokio::test]
    async fn test_apply_create_rejects_blank_name() {
        let repo = test_repository().await;

        let feedback = apply(&repo, &form(&[("action", "create"), ("name", "  ")]))
            .await
            .unwrap();
        assert_eq!(
            feedback,
            Feedback::Errors(vec![ValidationError::NameRequired])
        );
        assert!(repo.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_apply_unknown_action_is_readonly() {
        let repo = test_repository().await;

        let feedback = apply(&repo, &form(&[("action", "purge"), ("name", "T-14")]))
            .await
            .unwrap();
        assert_eq!(feedback, Feedback::None);
        assert!(repo.list_all().await.unwrap().is_empty());

        let feedback = apply(&repo, &TankForm::default()).await.unwrap();
        assert_eq!(feedback, Feedback::None);
    }

    #[tokio::test]
    async fn test_apply_delete_notice_is_unconditional() {
        let repo = test_repository().await;

        let feedback = apply(&repo, &form(&[("action", "delete"), ("id", "555")]))
            .await
            .unwrap();
        assert_eq!(feedback, Feedback::Notice(NOTICE_DELETED));
    }

    #[tokio::test]
    async fn test_apply_update_unknown_id_still_succeeds() {
        let repo = test_repository().await;

        let feedback = apply(
            &repo,
            &form(&[("action", "update"), ("id", "bogus"), ("name", "T-64")]),
        )
        .await
        .unwrap();
        assert_eq!(feedback, Feedback::Notice(NOTICE_UPDATED));
        assert!(repo.list_all().await.unwrap().is_empty());
    }
}
