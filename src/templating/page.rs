use liquid::Template;
use serde::Serialize;
use serde_json::Value;

use crate::{error::Result, view::ViewSnapshot};

/// The fixed page chrome around the directory table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub title: String,
    pub subtitle: String,
}

impl Default for PageInfo {
    fn default() -> PageInfo {
        PageInfo {
            title: "DOC --OSC".to_string(),
            subtitle: "Startup Resource Directory".to_string(),
        }
    }
}

/// Render the full directory page.  `logs` is `Value::Null` unless a debug
/// rendering was requested.
pub fn render_page(
    template: &Template,
    page: &PageInfo,
    view: &ViewSnapshot,
    logs: Value,
) -> Result<String> {
    let globals = liquid::object!({
        "page": serde_json::to_value(page)?,
        "view": serde_json::to_value(view)?,
        "logs": logs,
    });
    Ok(template.render(&globals)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::test_support::design_ai_design,
        clock::ClockReading,
        interaction::LoggingNavigator,
        templating::builder::build_and_parse_directory_page,
        view::{DirectoryView, ViewOptions},
    };

    fn render(view: &DirectoryView) -> String {
        let template = build_and_parse_directory_page().unwrap();
        render_page(&template, &PageInfo::default(), &view.snapshot(), Value::Null).unwrap()
    }

    #[test]
    fn renders_rows_chips_and_count() {
        let mut view = DirectoryView::new(
            design_ai_design(),
            Box::new(LoggingNavigator),
            ViewOptions::default(),
        );
        view.select_category("Design").unwrap();
        view.hover_enter(3).unwrap();

        let html = render(&view);
        assert!(html.contains("<title>DOC --OSC | Startup Resource Directory</title>"));
        assert!(html.contains("2 Items"));
        assert!(html.contains(r#"<a class="chip active" href="/?category=Design">Design</a>"#));
        assert!(html.contains(r#"<a class="chip" href="/?category=AI">AI</a>"#));
        assert!(html.contains(r#"<a class="row hovered" href="/open/3""#));
        assert!(html.contains(r#"<a class="row" href="/open/1""#));
        assert!(!html.contains(r#"href="/open/2""#));
        assert!(html.contains(r#"<div class="number">003</div>"#));
        assert!(!html.contains("debug-logs"));
        assert!(!html.contains(r#"class="clock""#));
    }

    #[test]
    fn renders_clock_and_escapes_text() {
        let catalog = crate::catalog::Catalog::new(vec![crate::catalog::Resource {
            id: 1,
            name: "Tom & Jerry".to_string(),
            category: "<Cartoons>".to_string(),
            description: String::new(),
            url: url::Url::parse("https://www.example.com/").unwrap(),
        }])
        .unwrap();
        let mut view = DirectoryView::new(catalog, Box::new(LoggingNavigator), ViewOptions::default());
        view.set_clock(ClockReading {
            time: "09:05:03 PM".to_string(),
            date: "FRIDAY, OCTOBER 16, 2026".to_string(),
        });

        let html = render(&view);
        assert!(html.contains("Tom &amp; Jerry"));
        assert!(html.contains("&lt;Cartoons&gt;"));
        assert!(html.contains(r#"title="example.com""#));
        assert!(html.contains(r#"<span class="time">09:05:03 PM</span>"#));
        assert!(html.contains(r#"<span class="date">FRIDAY, OCTOBER 16, 2026</span>"#));
    }
}
