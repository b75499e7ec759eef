//! Renderer: evaluates a compiled template and encodes it as a data URI

mod optimizer;
mod params;

pub use optimizer::{CommandOptimizer, Optimizer};
pub use params::Params;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::OptimizeError;
use crate::template::Template;

/// Characters `encodeURIComponent` leaves alone: A-Z a-z 0-9 - _ . ! ~ * ' ( )
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Evaluate `template` with `params` laid over `defaults`
pub fn render_markup(template: &Template, params: &Params, defaults: &Params) -> String {
    template.evaluate(&params.merged_over(defaults))
}

/// Markup through the optimizer, when one is configured
pub fn optimize(markup: String, optimizer: Option<&dyn Optimizer>) -> Result<String, OptimizeError> {
    match optimizer {
        Some(optimizer) => optimizer.optimize(&markup),
        None => Ok(markup),
    }
}

/// Percent-encode markup into a CSS `url("data:...")` value
///
/// ```rust
/// use simple_svg::renderer::data_uri;
///
/// assert_eq!(
///     data_uri(r##"<svg fill="#fff"/>"##),
///     r#"url("data:image/svg+xml;charset=utf-8,%3Csvg%20fill%3D%22%23fff%22%2F%3E")"#
/// );
/// ```
pub fn data_uri(markup: &str) -> String {
    format!(
        "url(\"data:image/svg+xml;charset=utf-8,{}\")",
        utf8_percent_encode(markup, URI_COMPONENT)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{Lookup, Segment};

    #[test]
    fn test_data_uri_keeps_unreserved_characters() {
        assert_eq!(
            data_uri("a-b_c.d!e~f*g'h(i)j"),
            "url(\"data:image/svg+xml;charset=utf-8,a-b_c.d!e~f*g'h(i)j\")"
        );
    }

    #[test]
    fn test_data_uri_encodes_utf8() {
        assert_eq!(
            data_uri("é #"),
            "url(\"data:image/svg+xml;charset=utf-8,%C3%A9%20%23\")"
        );
    }

    #[test]
    fn test_render_markup_merges_defaults() {
        let template = Template::from_segments(vec![Segment::Lookup(Lookup::new(
            vec!["a".to_string()],
            "fallback",
        ))]);
        let defaults = Params::parse("a:default");

        assert_eq!(render_markup(&template, &Params::new(), &defaults), "default");
        assert_eq!(render_markup(&template, &Params::parse("a:mine"), &defaults), "mine");
    }

    #[test]
    fn test_optimize_passes_through_without_optimizer() {
        assert_eq!(optimize("<svg/>".to_string(), None).unwrap(), "<svg/>");

        let upper = |markup: &str| -> Result<String, OptimizeError> { Ok(markup.to_uppercase()) };
        assert_eq!(
            optimize("<svg/>".to_string(), Some(&upper)).unwrap(),
            "<SVG/>"
        );
    }
}
