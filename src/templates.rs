use tera::Tera;

use crate::config::TEMPLATE_GLOB;
use crate::error::AppError;

/// Initialize the Tera template engine
pub fn init_templates() -> Result<Tera, AppError> {
    let tera = Tera::new(TEMPLATE_GLOB)?;
    Ok(tera)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_template_interpolates_message() {
        let tera = init_templates().expect("templates load");

        let mut context = tera::Context::new();
        context.insert("config", &crate::config::UiConfig::default());
        context.insert("message", "hola");

        let html = tera.render("index.html", &context).expect("render");
        assert!(html.contains("hola"));
        assert!(html.contains("Hola Mundo"));
    }
}
