use liquid_core::Result;
use liquid_core::Runtime;
use liquid_core::{Display_filter, Filter, FilterReflection, ParseFilter};
use liquid_core::{Value, ValueView};
use serde_json::to_string_pretty;
use url::{form_urlencoded::byte_serialize, Url};

#[derive(Clone, ParseFilter, FilterReflection)]
#[filter(
    name = "json",
    description = "Render the provided object into pretty-printed JSON.",
    parsed(JsonFilter)
)]
pub struct JsonFilterParser;

#[derive(Debug, Default, Display_filter)]
#[name = "json"]
struct JsonFilter;

impl Filter for JsonFilter {
    fn evaluate(&self, input: &dyn ValueView, _runtime: &dyn Runtime) -> Result<Value> {
        let s = to_string_pretty(&input.to_value()).unwrap_or_else(|_e| "".to_string());
        Ok(Value::scalar(s))
    }
}

#[derive(Clone, ParseFilter, FilterReflection)]
#[filter(
    name = "url_host",
    description = "Extract the host from a URL string, without any leading `www.`.",
    parsed(UrlHostFilter)
)]
pub struct UrlHostFilterParser;

#[derive(Debug, Default, Display_filter)]
#[name = "url_host"]
struct UrlHostFilter;

impl Filter for UrlHostFilter {
    fn evaluate(&self, input: &dyn ValueView, _runtime: &dyn Runtime) -> Result<Value> {
        let s = input.to_kstr();
        let host = match Url::parse(&s) {
            Ok(url) => url
                .host_str()
                .map(|h| h.strip_prefix("www.").unwrap_or(h).to_string())
                .unwrap_or_default(),
            Err(_) => "".to_string(),
        };
        Ok(Value::scalar(host))
    }
}

#[derive(Clone, ParseFilter, FilterReflection)]
#[filter(
    name = "category_query",
    description = "Encode a category label for use as a `category` query parameter value.",
    parsed(CategoryQueryFilter)
)]
pub struct CategoryQueryFilterParser;

#[derive(Debug, Default, Display_filter)]
#[name = "category_query"]
struct CategoryQueryFilter;

impl Filter for CategoryQueryFilter {
    fn evaluate(&self, input: &dyn ValueView, _runtime: &dyn Runtime) -> Result<Value> {
        let s = input.to_kstr();
        let encoded: String = byte_serialize(s.as_bytes()).collect();
        Ok(Value::scalar(encoded))
    }
}

#[cfg(test)]
mod tests {
    use crate::templating::builder::build_and_parse;

    fn render(source: &str, value: &str) -> String {
        let template = build_and_parse(source).unwrap();
        template
            .render(&liquid::object!({ "value": value }))
            .unwrap()
    }

    #[test]
    fn url_host_strips_www() {
        assert_eq!(render("{{ value | url_host }}", "https://www.figma.com/"), "figma.com");
        assert_eq!(render("{{ value | url_host }}", "https://stripe.com/atlas"), "stripe.com");
        assert_eq!(render("{{ value | url_host }}", "not a url"), "");
    }

    #[test]
    fn category_query_encodes() {
        assert_eq!(render("{{ value | category_query }}", "AI"), "AI");
        assert_eq!(render("{{ value | category_query }}", "Dev & Ops"), "Dev+%26+Ops");
    }
}
