//! Name-pattern recognition for taint sources, sinks and sanitizers.
//! Recognition is purely syntactic — a parameter named `user_id`, a
//! call to `db.execute`, a call to `html_escape` — since there is no
//! type binder to consult for a richer signal.

use crate::config::TaintToggles;
use crate::features::taint_analysis::domain::{SinkKind, SourceKind};
use once_cell::sync::Lazy;
use regex::Regex;

static USER_INPUT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(user_.*|.*_input|request.*|param.*)$").unwrap());
static ENV_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(env_.*|getenv.*)$").unwrap());
static FILE_READ_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(read_?file.*|readalltext|file_?content.*)$").unwrap());
static NETWORK_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(.*response_?body|recv.*|socket_?read.*)$").unwrap());
static DB_RESULT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(row.*|query_?result.*|resultset.*)$").unwrap());

static SQL_SINK_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(execute|executequery|executenonquery|query|exec_sql)$").unwrap());
static COMMAND_SINK_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(exec|system|shell_?exec|spawn|run_?command)$").unwrap());
static PATH_SINK_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(open|readalltext|writealltext|delete|create_?file)$").unwrap());
static HTML_SINK_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(write|innerhtml|render_?raw|print)$").unwrap());
static EVAL_SINK_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(eval|execscript|compile_?and_?run)$").unwrap());

static SANITIZER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(escape.*|sanitize.*|.*_escape|html_?escape|quote.*|validate.*)$").unwrap()
});

/// Classifies a parameter or binding name as a taint source, honoring the
/// config's per-category toggles.
pub fn classify_source_name(name: &str, toggles: &TaintToggles) -> Option<SourceKind> {
    if toggles.user_input && USER_INPUT_PATTERN.is_match(name) {
        return Some(SourceKind::UserInput);
    }
    if toggles.environment && ENV_PATTERN.is_match(name) {
        return Some(SourceKind::Environment);
    }
    if toggles.file_read && FILE_READ_PATTERN.is_match(name) {
        return Some(SourceKind::FileRead);
    }
    if toggles.network_input && NETWORK_PATTERN.is_match(name) {
        return Some(SourceKind::NetworkInput);
    }
    if toggles.database_result && DB_RESULT_PATTERN.is_match(name) {
        return Some(SourceKind::DatabaseResult);
    }
    None
}

/// Classifies a called function/method name as a sink, honoring toggles.
pub fn classify_sink_name(name: &str, toggles: &TaintToggles) -> Option<SinkKind> {
    let short = name.rsplit("::").next().unwrap_or(name);
    if toggles.sql_sink && SQL_SINK_PATTERN.is_match(short) {
        return Some(SinkKind::Sql);
    }
    if toggles.command_sink && COMMAND_SINK_PATTERN.is_match(short) {
        return Some(SinkKind::Command);
    }
    if toggles.path_sink && PATH_SINK_PATTERN.is_match(short) {
        return Some(SinkKind::Path);
    }
    if toggles.html_sink && HTML_SINK_PATTERN.is_match(short) {
        return Some(SinkKind::Html);
    }
    if toggles.eval_sink && EVAL_SINK_PATTERN.is_match(short) {
        return Some(SinkKind::Eval);
    }
    None
}

/// True when calling `name` strips all taint from its first argument.
pub fn is_sanitizer(name: &str) -> bool {
    let short = name.rsplit("::").next().unwrap_or(name);
    SANITIZER_PATTERN.is_match(short)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_on() -> TaintToggles {
        TaintToggles::default()
    }

    #[test]
    fn recognizes_user_input_parameter_names() {
        assert_eq!(
            classify_source_name("user_name", &all_on()),
            Some(SourceKind::UserInput)
        );
        assert_eq!(
            classify_source_name("search_input", &all_on()),
            Some(SourceKind::UserInput)
        );
    }

    #[test]
    fn toggled_off_category_is_not_recognized() {
        let toggles = TaintToggles {
            user_input: false,
            ..all_on()
        };
        assert_eq!(classify_source_name("user_name", &toggles), None);
    }

    #[test]
    fn recognizes_sql_sink_call_names() {
        assert_eq!(
            classify_sink_name("db::execute", &all_on()),
            Some(SinkKind::Sql)
        );
    }

    #[test]
    fn recognizes_sanitizer_names() {
        assert!(is_sanitizer("html_escape"));
        assert!(is_sanitizer("sanitize_input"));
        assert!(!is_sanitizer("write"));
    }
}
