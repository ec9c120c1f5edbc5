use std::sync::OnceLock;

use regex::Regex;

/// Tables owned by this service, longest first so that prefix matching on
/// constraint names picks `job_post_categories` over `job_posts`.
const KNOWN_TABLES: &[&str] = &[
    "job_post_categories",
    "job_categories",
    "job_posts",
    "companies",
    "users",
];

/// Utility for parsing PostgreSQL constraint violation messages.
///
/// PostgreSQL reports the offending key in the DETAIL part of the error
/// (`Key (email)=(a@b.c) already exists.`) and, when available, the table
/// and constraint names as separate fields. The parser prefers those
/// structured fields and falls back to the constraint naming convention
/// `{table}_{column}_{suffix}`.
pub struct ConstraintParser;

struct RegexPatterns {
    key_value: Regex,
    column_name: Regex,
    table_name: Regex,
}

static REGEX_PATTERNS: OnceLock<Option<RegexPatterns>> = OnceLock::new();

impl ConstraintParser {
    fn patterns() -> Option<&'static RegexPatterns> {
        REGEX_PATTERNS
            .get_or_init(|| {
                Some(RegexPatterns {
                    key_value: Regex::new(r"Key \(([^)]+)\)=\(([^)]*)\)").ok()?,
                    column_name: Regex::new(r#"column "([^"]+)""#).ok()?,
                    table_name: Regex::new(r#"(?:table|relation) "([^"]+)""#).ok()?,
                })
            })
            .as_ref()
    }

    /// Extracts `(entity, field, value)` from a unique violation.
    ///
    /// ```
    /// use careers_rs::error::ConstraintParser;
    ///
    /// let parsed = ConstraintParser::parse_unique_violation(
    ///     "duplicate key value violates unique constraint \"users_email_key\"",
    ///     Some("Key (email)=(jane@example.com) already exists."),
    ///     Some("users"),
    ///     Some("users_email_key"),
    /// );
    /// assert_eq!(
    ///     parsed,
    ///     Some(("user".to_string(), "email".to_string(), "jane@example.com".to_string()))
    /// );
    /// ```
    pub fn parse_unique_violation(
        message: &str,
        details: Option<&str>,
        table: Option<&str>,
        constraint: Option<&str>,
    ) -> Option<(String, String, String)> {
        let (field, value) = details
            .and_then(Self::extract_key_value)
            .or_else(|| Self::extract_key_value(message))
            .or_else(|| {
                constraint
                    .and_then(Self::parse_constraint_name)
                    .map(|(_, field)| (field, "duplicate_value".to_string()))
            })?;

        let entity = Self::resolve_table(message, table, constraint)?;
        Some((Self::entity_name(&entity), field, value))
    }

    /// Extracts `(entity, field, referenced_value)` from a foreign key violation.
    pub fn parse_foreign_key_violation(
        message: &str,
        details: Option<&str>,
        table: Option<&str>,
        constraint: Option<&str>,
    ) -> Option<(String, String, String)> {
        let (field, value) = details
            .and_then(Self::extract_key_value)
            .or_else(|| Self::extract_key_value(message))
            .or_else(|| {
                constraint
                    .and_then(Self::parse_constraint_name)
                    .map(|(_, field)| (field, "invalid_reference".to_string()))
            })?;

        let entity = Self::resolve_table(message, table, constraint)?;
        Some((Self::entity_name(&entity), field, value))
    }

    /// Extracts `(entity, field)` from a not-null violation.
    pub fn parse_not_null_violation(
        message: &str,
        table: Option<&str>,
        column: Option<&str>,
    ) -> Option<(String, String)> {
        let field = column
            .map(str::to_string)
            .or_else(|| Self::extract_column(message))?;
        let entity = Self::resolve_table(message, table, None).unwrap_or_else(|| "resource".to_string());
        Some((Self::entity_name(&entity), field))
    }

    /// Extracts `(entity, field)` from a check violation, using the constraint name.
    pub fn parse_check_violation(
        message: &str,
        table: Option<&str>,
        constraint: Option<&str>,
    ) -> Option<(String, String)> {
        if let Some((entity, field)) = constraint.and_then(Self::parse_constraint_name) {
            return Some((Self::entity_name(&entity), field));
        }
        let field = Self::extract_column(message)?;
        let entity = Self::resolve_table(message, table, None).unwrap_or_else(|| "resource".to_string());
        Some((Self::entity_name(&entity), field))
    }

    /// Splits a constraint name such as `job_posts_company_id_fkey` into
    /// `("job_posts", "company_id")`.
    ///
    /// Known tables are matched by prefix; anything else falls back to
    /// treating the first segment as the table.
    pub fn parse_constraint_name(constraint: &str) -> Option<(String, String)> {
        let body = ["_fkey", "_key", "_check", "_idx", "_pkey"]
            .iter()
            .find_map(|suffix| constraint.strip_suffix(suffix))
            .unwrap_or(constraint);

        for table in KNOWN_TABLES {
            if let Some(rest) = body.strip_prefix(table).and_then(|r| r.strip_prefix('_'))
                && !rest.is_empty()
            {
                return Some((table.to_string(), rest.to_string()));
            }
        }

        let (table, field) = body.split_once('_')?;
        if table.is_empty() || field.is_empty() {
            return None;
        }
        Some((table.to_string(), field.to_string()))
    }

    /// Singular entity name for a table (`job_categories` -> `job_category`).
    pub fn entity_name(table: &str) -> String {
        if let Some(stem) = table.strip_suffix("ies") {
            format!("{}y", stem)
        } else if let Some(stem) = table.strip_suffix('s') {
            stem.to_string()
        } else {
            table.to_string()
        }
    }

    /// Extracts `(field, value)` from a `Key (field)=(value)` fragment.
    pub fn extract_key_value(text: &str) -> Option<(String, String)> {
        let caps = Self::patterns()?.key_value.captures(text)?;
        Some((caps.get(1)?.as_str().to_string(), caps.get(2)?.as_str().to_string()))
    }

    pub fn extract_column(message: &str) -> Option<String> {
        Self::patterns()?
            .column_name
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    pub fn extract_table(message: &str) -> Option<String> {
        Self::patterns()?
            .table_name
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    fn resolve_table(message: &str, table: Option<&str>, constraint: Option<&str>) -> Option<String> {
        table
            .map(str::to_string)
            .or_else(|| constraint.and_then(Self::parse_constraint_name).map(|(t, _)| t))
            .or_else(|| Self::extract_table(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_constraint_name_simple_table() {
        assert_eq!(
            ConstraintParser::parse_constraint_name("users_email_key"),
            Some(("users".to_string(), "email".to_string()))
        );
    }

    #[test]
    fn test_parse_constraint_name_multi_word_table() {
        assert_eq!(
            ConstraintParser::parse_constraint_name("job_posts_company_id_fkey"),
            Some(("job_posts".to_string(), "company_id".to_string()))
        );
        assert_eq!(
            ConstraintParser::parse_constraint_name("job_post_categories_job_category_id_fkey"),
            Some(("job_post_categories".to_string(), "job_category_id".to_string()))
        );
    }

    #[test]
    fn test_parse_constraint_name_unknown_table() {
        assert_eq!(
            ConstraintParser::parse_constraint_name("posts_title_idx"),
            Some(("posts".to_string(), "title".to_string()))
        );
        assert_eq!(ConstraintParser::parse_constraint_name("nounderscore"), None);
    }

    #[test]
    fn test_entity_name() {
        assert_eq!(ConstraintParser::entity_name("users"), "user");
        assert_eq!(ConstraintParser::entity_name("companies"), "company");
        assert_eq!(ConstraintParser::entity_name("job_categories"), "job_category");
        assert_eq!(ConstraintParser::entity_name("job_post_categories"), "job_post_category");
        assert_eq!(ConstraintParser::entity_name("job_posts"), "job_post");
    }

    #[test]
    fn test_unique_violation_from_details() {
        let parsed = ConstraintParser::parse_unique_violation(
            "duplicate key value violates unique constraint \"users_phone_key\"",
            Some("Key (phone)=(0812345678) already exists."),
            None,
            Some("users_phone_key"),
        );
        assert_eq!(
            parsed,
            Some(("user".to_string(), "phone".to_string(), "0812345678".to_string()))
        );
    }

    #[test]
    fn test_unique_violation_composite_key() {
        let parsed = ConstraintParser::parse_unique_violation(
            "duplicate key value violates unique constraint",
            Some("Key (job_post_id, job_category_id)=(a, b) already exists."),
            Some("job_post_categories"),
            None,
        );
        assert_eq!(
            parsed,
            Some((
                "job_post_category".to_string(),
                "job_post_id, job_category_id".to_string(),
                "a, b".to_string()
            ))
        );
    }

    #[test]
    fn test_unique_violation_without_details_uses_constraint() {
        let parsed = ConstraintParser::parse_unique_violation(
            "duplicate key value violates unique constraint \"companies_email_key\"",
            None,
            None,
            Some("companies_email_key"),
        );
        assert_eq!(
            parsed,
            Some(("company".to_string(), "email".to_string(), "duplicate_value".to_string()))
        );
    }

    #[test]
    fn test_foreign_key_violation() {
        let parsed = ConstraintParser::parse_foreign_key_violation(
            "insert or update on table \"job_posts\" violates foreign key constraint \"job_posts_company_id_fkey\"",
            Some("Key (company_id)=(6f1c0d4e-0000-0000-0000-000000000000) is not present in table \"companies\"."),
            Some("job_posts"),
            Some("job_posts_company_id_fkey"),
        );
        assert_eq!(
            parsed,
            Some((
                "job_post".to_string(),
                "company_id".to_string(),
                "6f1c0d4e-0000-0000-0000-000000000000".to_string()
            ))
        );
    }

    #[test]
    fn test_not_null_violation() {
        let parsed = ConstraintParser::parse_not_null_violation(
            "null value in column \"title\" of relation \"job_posts\" violates not-null constraint",
            None,
            None,
        );
        assert_eq!(parsed, Some(("job_post".to_string(), "title".to_string())));
    }

    #[test]
    fn test_check_violation() {
        let parsed = ConstraintParser::parse_check_violation(
            "new row for relation \"job_post_categories\" violates check constraint",
            None,
            Some("job_post_categories_required_count_check"),
        );
        assert_eq!(
            parsed,
            Some(("job_post_category".to_string(), "required_count".to_string()))
        );
    }

    #[test]
    fn test_extract_helpers() {
        assert_eq!(
            ConstraintParser::extract_key_value("Key (email)=(a@b.c) already exists."),
            Some(("email".to_string(), "a@b.c".to_string()))
        );
        assert_eq!(
            ConstraintParser::extract_column("null value in column \"name\""),
            Some("name".to_string())
        );
        assert_eq!(
            ConstraintParser::extract_table("on table \"users\""),
            Some("users".to_string())
        );
        assert_eq!(ConstraintParser::extract_key_value("no key here"), None);
    }
}
