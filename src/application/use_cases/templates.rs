use crate::domain::classification::ClassificationResult;
use crate::infrastructure::response::escape_html;

pub const ERROR_MESSAGE: &str = "Ocorreu um erro ao processar o email.";

/// Fixed result template; both values are inserted as text content.
pub fn render_result(result: &ClassificationResult) -> String {
    format!(
        "<h3>Resultado da Classificação:</h3>\n\
         <p><strong>Categoria:</strong> {}</p>\n\
         <p><strong>Resposta Sugerida:</strong> {}</p>",
        escape_html(&result.category),
        escape_html(&result.suggested_response)
    )
}

pub fn render_error() -> String {
    format!("<p>{}</p>", ERROR_MESSAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_contains_both_values() {
        let html = render_result(&ClassificationResult::new(
            "Improdutivo",
            "Nenhuma ação necessária.",
        ));
        assert!(html.contains("Improdutivo"));
        assert!(html.contains("Nenhuma ação necessária."));
        assert!(html.starts_with("<h3>Resultado da Classificação:</h3>"));
    }

    #[test]
    fn test_result_values_cannot_inject_markup() {
        let html = render_result(&ClassificationResult::new(
            "<script>alert(1)</script>",
            "<b>ok</b>",
        ));
        assert!(!html.contains("<script"));
        assert!(!html.contains("<b>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn test_error_is_fixed_message() {
        assert_eq!(render_error(), "<p>Ocorreu um erro ao processar o email.</p>");
    }
}
