mod common;
use common::{temp_dir, write_file};

use minijinja::context;
use sitefeed::config::PageConfig;
use sitefeed::core::compactor::ScheduleCompactor;
use sitefeed::errors::AppError;
use sitefeed::models::schedule::{DisplayRow, RawRow};
use sitefeed::publish::github::{GitHubPublisher, RemoteFile, UpdateRequest, contents_url};
use sitefeed::publish::{DirPublisher, PublishOutcome, Publisher};
use sitefeed::render::Renderer;
use std::fs;

fn sample_rows() -> Vec<DisplayRow> {
    let raw = vec![
        RawRow::new(2, "09.00 - 09.30", "Room A", "Talk"),
        RawRow::new(3, "09.30 - 10.00", "", "Vapaa"),
        RawRow::new(4, "10.00 - 10.15", "", "Vapaa"),
        RawRow::new(5, "10.15 - 10.30", "Room B", "Q&A"),
    ];
    ScheduleCompactor::new("Vapaa").compact(&raw).unwrap()
}

fn page(locale: &str, template: Option<String>) -> PageConfig {
    PageConfig {
        locale: locale.to_string(),
        template,
        target: "program.html".to_string(),
    }
}

#[test]
fn test_builtin_finnish_schedule_template() {
    let rows = sample_rows();
    let html = Renderer::new()
        .unwrap()
        .render("schedule", &page("fi", None), context! { rows => &rows })
        .unwrap();

    assert!(html.contains("<th>Aika</th>"));
    assert!(html.contains("09.30 - 10.15"));
    assert!(html.contains(r#"class="free" data-units="9""#));
    assert!(html.contains("Room A"));
    // autoescaped
    assert!(html.contains("Q&amp;A"));
}

#[test]
fn test_builtin_english_schedule_template() {
    let rows = sample_rows();
    let html = Renderer::new()
        .unwrap()
        .render("schedule", &page("en", None), context! { rows => &rows })
        .unwrap();

    assert!(html.contains("<th>Time</th>"));
    assert!(html.contains("09:30 - 10:15"));
    assert!(html.contains("Free time"));
    assert!(!html.contains("Vapaa"));
}

#[test]
fn test_unknown_locale_without_template_is_a_config_error() {
    let err = Renderer::new()
        .unwrap()
        .render("schedule", &page("sv", None), context! { rows => Vec::<DisplayRow>::new() })
        .unwrap_err();

    assert!(matches!(err, AppError::Config(_)));
}

#[test]
fn test_custom_template_file() {
    let dir = temp_dir("custom_template");
    let path = write_file(
        &dir,
        "program_sv.html",
        "{% for row in rows %}[{{ row.activity }}@{{ row.location }}]{% endfor %}",
    );

    let rows = sample_rows();
    let html = Renderer::new()
        .unwrap()
        .render("schedule", &page("sv", Some(path)), context! { rows => &rows })
        .unwrap();

    assert_eq!(html, "[Talk@Room A][Vapaa@Room A][Q&amp;A@Room B]");
}

#[test]
fn test_broken_template_is_a_template_error() {
    let dir = temp_dir("broken_template");
    let path = write_file(&dir, "broken.html", "{% for row in rows %}{{ row.activity }");

    let err = Renderer::new()
        .unwrap()
        .render("schedule", &page("fi", Some(path)), context! { rows => sample_rows() })
        .unwrap_err();

    assert!(matches!(err, AppError::Template(_)));
}

#[test]
fn test_supporters_template_links_only_valid_sites() {
    let html = Renderer::new()
        .unwrap()
        .render(
            "supporters",
            &page("fi", None),
            context! {
                supporters => vec![
                    context! { organization => "Luova Club", link => "https://luova.club" },
                    context! { organization => "Gmail Org", link => () },
                ],
            },
        )
        .unwrap();

    // slashes in attribute values come out entity-encoded
    assert!(html.contains(r#"luova.club">Luova Club</a></li>"#));
    assert!(html.contains("<li><a href="));
    assert!(html.contains("<li>Gmail Org</li>"));
}

#[test]
fn test_dir_publisher_is_idempotent() {
    let dir = temp_dir("dir_publisher");
    let publisher = DirPublisher::new(&dir);

    let first = publisher.publish("en/program.html", "<p>1</p>", "msg").unwrap();
    let again = publisher.publish("en/program.html", "<p>1</p>", "msg").unwrap();
    let changed = publisher.publish("en/program.html", "<p>2</p>", "msg").unwrap();

    assert_eq!(first, PublishOutcome::Created);
    assert_eq!(again, PublishOutcome::Unchanged);
    assert_eq!(changed, PublishOutcome::Updated);
    assert_eq!(
        fs::read_to_string(dir.join("en/program.html")).unwrap(),
        "<p>2</p>"
    );
}

#[test]
fn test_dir_publisher_refuses_to_leave_its_root() {
    let dir = temp_dir("dir_publisher_escape");
    let err = DirPublisher::new(&dir)
        .publish("../escape.html", "x", "msg")
        .unwrap_err();

    assert!(matches!(err, AppError::Publish(_)));
}

#[test]
fn test_contents_url() {
    assert_eq!(
        contents_url("https://api.github.com/", "owner/site", "/en/program.html"),
        "https://api.github.com/repos/owner/site/contents/en/program.html"
    );
}

#[test]
fn test_update_request_body() {
    let body = serde_json::to_value(UpdateRequest::new("Update", "hei", Some("abc123"), "main"))
        .unwrap();
    assert_eq!(body["content"], "aGVp");
    assert_eq!(body["sha"], "abc123");
    assert_eq!(body["branch"], "main");
    assert_eq!(body["message"], "Update");

    let create = serde_json::to_value(UpdateRequest::new("Add", "hei", None, "main")).unwrap();
    assert!(create.get("sha").is_none());
}

#[test]
fn test_remote_file_decoding() {
    let file: RemoteFile =
        serde_json::from_str(r#"{"sha":"1","content":"aGVp\nIG1h\n","encoding":"base64"}"#)
            .unwrap();
    assert_eq!(file.decoded().as_deref(), Some("hei ma"));

    let large: RemoteFile =
        serde_json::from_str(r#"{"sha":"2","content":"","encoding":"none"}"#).unwrap();
    assert_eq!(large.decoded(), None);
}

#[test]
fn test_github_publisher_rejects_malformed_repository() {
    let publish = sitefeed::config::PublishConfig {
        repository: "just-a-name".into(),
        ..Default::default()
    };
    let err = GitHubPublisher::new(&publish, &Default::default(), "token".into())
        .err()
        .expect("malformed repository must be rejected");

    assert!(matches!(err, AppError::Config(_)));
}
