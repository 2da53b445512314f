use crate::domain::error::{AppError, Result};
use crate::domain::verification::{VerificationCheck, VerificationReport, VerificationScenario};
use crate::infrastructure::browser::BrowserSession;
use crate::infrastructure::logging::{add_log, SharedLogs};

const LOG_SOURCE: &str = "Verification";

/// Drives one classification round trip through the page and asserts on
/// the results view. Stops at the first failed check; never retries.
pub struct VerificationUseCase {
    logs: SharedLogs,
}

impl VerificationUseCase {
    pub fn new(logs: SharedLogs) -> Self {
        Self { logs }
    }

    pub async fn execute(
        &self,
        session: &mut dyn BrowserSession,
        base_url: &str,
        scenario: &VerificationScenario,
    ) -> Result<VerificationReport> {
        add_log(
            &self.logs,
            "INFO",
            LOG_SOURCE,
            &format!("Visiting {}", base_url),
        );
        session.visit(base_url).await?;

        let text_field = session
            .find_first(&scenario.text_field_candidates)?
            .ok_or_else(|| {
                AppError::AssertionFailed(format!(
                    "no text field found; tried {}",
                    scenario.text_field_candidates.describe()
                ))
            })?
            .to_string();
        add_log(
            &self.logs,
            "DEBUG",
            LOG_SOURCE,
            &format!("Using text field {}", text_field),
        );

        session.fill(&text_field, &scenario.input_text)?;
        session.click(&scenario.submit_selector).await?;

        let mut passed = Vec::with_capacity(VerificationCheck::ALL.len());

        let final_url = session.current_url();
        self.check(
            &mut passed,
            VerificationCheck::UrlIncludesClassify,
            final_url.contains(&scenario.classify_path),
            || format!("expected url to include '{}', got '{}'", scenario.classify_path, final_url),
        )?;

        let panels = session.count(&scenario.score_panel_selector)?;
        self.check(
            &mut passed,
            VerificationCheck::ScorePanelExists,
            panels > 0,
            || format!("expected '{}' to exist", scenario.score_panel_selector),
        )?;

        let score_card_count = session.count(&scenario.score_card_selector)?;
        self.check(
            &mut passed,
            VerificationCheck::ScoreCardsPresent,
            score_card_count >= 1,
            || {
                format!(
                    "expected at least 1 '{}', found {}",
                    scenario.score_card_selector, score_card_count
                )
            },
        )?;

        self.check(
            &mut passed,
            VerificationCheck::LabelVisible,
            session.page_contains(&scenario.expected_label),
            || format!("expected page to contain '{}'", scenario.expected_label),
        )?;

        let score_cards = session.texts(&scenario.score_card_selector)?;
        add_log(
            &self.logs,
            "INFO",
            LOG_SOURCE,
            &format!(
                "All checks passed at {} ({} score cards)",
                final_url, score_card_count
            ),
        );

        Ok(VerificationReport {
            final_url,
            text_field,
            passed,
            score_card_count,
            score_cards,
        })
    }

    fn check<F>(
        &self,
        passed: &mut Vec<VerificationCheck>,
        check: VerificationCheck,
        ok: bool,
        describe: F,
    ) -> Result<()>
    where
        F: FnOnce() -> String,
    {
        if ok {
            passed.push(check);
            return Ok(());
        }
        let message = format!("{}: {}", check.label(), describe());
        add_log(&self.logs, "ERROR", LOG_SOURCE, &message);
        Err(AppError::AssertionFailed(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::browser::HttpBrowserSession;
    use crate::infrastructure::logging::new_shared_logs;
    use std::time::Duration;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const INPUT: &str = "This is a short productive email about a meeting and action items.";

    fn index_page(field_name: &str) -> String {
        format!(
            r#"<html><body>
  <form action="/classify" method="post" enctype="multipart/form-data">
    <textarea name="{}"></textarea>
    <input type="file" name="file">
    <button type="submit">Classificar</button>
  </form>
  <div id="result"></div>
</body></html>"#,
            field_name
        )
    }

    const RESULTS_PAGE: &str = r#"<html><body>
  <div id="classifier-fragment">
    <div class="score-panel">
      <div class="score-card score-good"><span>Produtivo</span> <span>0.82</span></div>
      <div class="score-card score-bad"><span>Improdutivo</span> <span>0.18</span></div>
    </div>
  </div>
</body></html>"#;

    async fn mount_site(server: &MockServer, field_name: &str, results: &str) {
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(index_page(field_name)))
            .mount(server)
            .await;

        Mock::given(method("POST"))
            .and(path("/classify"))
            .and(body_string_contains(format!("name=\"{}\"", field_name)))
            .and(body_string_contains(INPUT))
            .respond_with(ResponseTemplate::new(200).set_body_string(results.to_string()))
            .mount(server)
            .await;
    }

    async fn run(server: &MockServer) -> Result<VerificationReport> {
        let mut session = HttpBrowserSession::new(Duration::from_secs(5)).unwrap();
        VerificationUseCase::new(new_shared_logs())
            .execute(&mut session, &server.uri(), &VerificationScenario::default())
            .await
    }

    #[tokio::test]
    async fn test_productive_email_reaches_score_panel() {
        let server = MockServer::start().await;
        mount_site(&server, "email_text", RESULTS_PAGE).await;

        let report = run(&server).await.unwrap();

        assert!(report.final_url.contains("/classify"));
        assert_eq!(report.text_field, "textarea[name=\"email_text\"]");
        assert_eq!(report.passed, VerificationCheck::ALL.to_vec());
        assert_eq!(report.score_card_count, 2);
        assert_eq!(report.score_cards[0], "Produtivo 0.82");
    }

    #[tokio::test]
    async fn test_legacy_text_field_is_used_as_fallback() {
        let server = MockServer::start().await;
        mount_site(&server, "text", RESULTS_PAGE).await;

        let report = run(&server).await.unwrap();

        assert_eq!(report.text_field, "textarea[name=\"text\"]");
        assert_eq!(report.passed.len(), 4);
    }

    #[tokio::test]
    async fn test_missing_text_field_fails() {
        let server = MockServer::start().await;
        mount_site(&server, "body", RESULTS_PAGE).await;

        let err = run(&server).await.unwrap_err();
        match err {
            AppError::AssertionFailed(msg) => assert!(msg.contains("no text field found")),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_score_cards_names_the_check() {
        let server = MockServer::start().await;
        let empty_panel = r#"<div class="score-panel"><p>Produtivo</p></div>"#;
        mount_site(&server, "email_text", empty_panel).await;

        let err = run(&server).await.unwrap_err();
        match err {
            AppError::AssertionFailed(msg) => {
                assert!(msg.starts_with("at least one score card"), "{}", msg)
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unproductive_page_fails_on_label() {
        let server = MockServer::start().await;
        let page = r#"<div class="score-panel">
  <div class="score-card">Improdutivo 0.97</div>
</div>"#;
        mount_site(&server, "email_text", page).await;

        let err = run(&server).await.unwrap_err();
        assert_eq!(
            err,
            AppError::AssertionFailed(
                "expected label visible: expected page to contain 'Produtivo'".to_string()
            )
        );
    }

    #[tokio::test]
    async fn test_wrong_destination_fails_on_url_first() {
        let server = MockServer::start().await;
        let page = r#"<html><body>
  <form action="/submit" method="post"><textarea name="email_text"></textarea>
  <button type="submit">Go</button></form></body></html>"#;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/submit"))
            .respond_with(ResponseTemplate::new(200).set_body_string(RESULTS_PAGE))
            .mount(&server)
            .await;

        let err = run(&server).await.unwrap_err();
        match err {
            AppError::AssertionFailed(msg) => {
                assert!(msg.starts_with("url includes classify path"))
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
