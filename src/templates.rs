use minijinja::Environment;
use std::sync::OnceLock;

pub const INDEX: &str = "index.html";
pub const MARKER_POPUP: &str = "marker_popup.html";

static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

/// Templates are compiled into the binary; `.html` names are auto-escaped.
pub fn environment() -> &'static Environment<'static> {
    TEMPLATE_ENV.get_or_init(|| {
        let mut env = Environment::new();
        for (name, source) in [
            (INDEX, include_str!("../templates/index.html")),
            (MARKER_POPUP, include_str!("../templates/marker_popup.html")),
        ] {
            if let Err(e) = env.add_template(name, source) {
                tracing::warn!("Failed to load template {}: {}", name, e);
            }
        }
        env
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn bundled_templates_compile() {
        let env = environment();
        assert!(env.get_template(INDEX).is_ok());
        assert!(env.get_template(MARKER_POPUP).is_ok());
    }

    #[test]
    fn popup_escapes_html() {
        let html = environment()
            .get_template(MARKER_POPUP)
            .unwrap()
            .render(context! { lga_name => "<script>", state => "NSW", school_count => 3 })
            .unwrap();
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.ends_with("<b>School Count:</b><br>3"));
    }
}
