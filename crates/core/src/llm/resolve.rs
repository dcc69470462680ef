use crate::llm::{GenerateRequest, LlmClient};

/// Used when the catalog is empty or the listing call failed.
pub const DEFAULT_MODEL: &str = "models/gemini-1.5-flash";

/// Most-preferred first. Flash before Pro: the digest is latency- and
/// quota-sensitive, not quality-sensitive.
pub const PREFERRED_MODELS: &[&str] = &[
    "models/gemini-1.5-flash",
    "models/gemini-1.5-flash-latest",
    "models/gemini-1.5-pro",
    "models/gemini-pro",
];

/// Outcome of the catalog-membership strategy. `DefaultFallback` is the
/// degraded case; callers log it and carry on with the hardcoded default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    Preferred { model: String },
    CatalogFallback { model: String },
    DefaultFallback { model: String },
}

impl Resolved {
    pub fn model(&self) -> &str {
        match self {
            Resolved::Preferred { model }
            | Resolved::CatalogFallback { model }
            | Resolved::DefaultFallback { model } => model,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Resolved::DefaultFallback { .. })
    }
}

/// Catalog-membership strategy: first preference present in the catalog
/// wins; otherwise the first catalog entry; otherwise the hardcoded default.
///
/// A failed *listing call* is a different cause and stays the caller's
/// `Err` from `list_text_models` — do not feed an empty Vec here to mean
/// "service unreachable".
pub fn resolve_by_catalog(preferred: &[&str], catalog: &[String]) -> Resolved {
    for p in preferred {
        if catalog.iter().any(|m| m == p) {
            return Resolved::Preferred {
                model: (*p).to_string(),
            };
        }
    }

    if let Some(first) = catalog.first() {
        return Resolved::CatalogFallback {
            model: first.clone(),
        };
    }

    Resolved::DefaultFallback {
        model: DEFAULT_MODEL.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct Generated {
    pub model: String,
    pub text: String,
}

/// Try-until-success strategy: attempt generation against each preference in
/// order and keep the first success. Any failure (quota, permission,
/// transient) means try the next candidate; the loop is bounded by the list.
pub async fn generate_first_success(
    client: &dyn LlmClient,
    preferred: &[&str],
    req: &GenerateRequest,
) -> anyhow::Result<Generated> {
    anyhow::ensure!(!preferred.is_empty(), "preference list must be non-empty");

    let mut last_err = None;
    for &model in preferred {
        match client.generate_text(model, req).await {
            Ok(text) => {
                return Ok(Generated {
                    model: model.to_string(),
                    text,
                })
            }
            Err(err) => {
                tracing::warn!(model, error = %err, "generation failed; trying next candidate");
                last_err = Some(err);
            }
        }
    }

    Err(match last_err {
        Some(err) => err.context(format!("all {} candidate models failed", preferred.len())),
        None => anyhow::anyhow!("preference list must be non-empty"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Provider;
    use std::sync::Mutex;

    #[test]
    fn picks_earliest_preferred_match() {
        let catalog = vec![
            "models/gemini-pro".to_string(),
            "models/gemini-1.5-flash-latest".to_string(),
        ];
        let resolved = resolve_by_catalog(PREFERRED_MODELS, &catalog);
        assert_eq!(
            resolved,
            Resolved::Preferred {
                model: "models/gemini-1.5-flash-latest".to_string()
            }
        );
        assert!(!resolved.is_degraded());
    }

    #[test]
    fn preference_order_beats_catalog_order() {
        let catalog = vec!["modelA".to_string(), "modelB".to_string()];
        let resolved = resolve_by_catalog(&["modelB", "modelA"], &catalog);
        assert_eq!(resolved.model(), "modelB");
    }

    #[test]
    fn falls_back_to_first_catalog_entry() {
        let catalog = vec![
            "models/gemini-exp".to_string(),
            "models/gemini-exp".to_string(),
        ];
        let resolved = resolve_by_catalog(PREFERRED_MODELS, &catalog);
        assert_eq!(
            resolved,
            Resolved::CatalogFallback {
                model: "models/gemini-exp".to_string()
            }
        );
    }

    #[test]
    fn empty_catalog_degrades_to_default() {
        let resolved = resolve_by_catalog(PREFERRED_MODELS, &[]);
        assert_eq!(resolved.model(), DEFAULT_MODEL);
        assert!(resolved.is_degraded());
    }

    /// Fails generation for every model until the named one.
    struct FailUntil {
        succeed_on: &'static str,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl LlmClient for FailUntil {
        fn provider(&self) -> Provider {
            Provider::Gemini
        }

        async fn list_text_models(&self) -> anyhow::Result<Vec<String>> {
            Ok(vec![])
        }

        async fn generate_text(
            &self,
            model: &str,
            _req: &GenerateRequest,
        ) -> anyhow::Result<String> {
            self.calls.lock().unwrap().push(model.to_string());
            if model == self.succeed_on {
                Ok("ok".to_string())
            } else {
                anyhow::bail!("quota exceeded for {model}")
            }
        }
    }

    #[tokio::test]
    async fn probe_strategy_stops_at_first_success() {
        let client = FailUntil {
            succeed_on: "b",
            calls: Mutex::new(Vec::new()),
        };
        let req = GenerateRequest::deterministic("p".to_string());
        let out = generate_first_success(&client, &["a", "b", "c"], &req)
            .await
            .unwrap();
        assert_eq!(out.model, "b");
        assert_eq!(out.text, "ok");
        assert_eq!(*client.calls.lock().unwrap(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn probe_strategy_errors_after_exhausting_list() {
        let client = FailUntil {
            succeed_on: "never",
            calls: Mutex::new(Vec::new()),
        };
        let req = GenerateRequest::deterministic("p".to_string());
        let err = generate_first_success(&client, &["a", "b"], &req)
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("all 2 candidate models failed"));
    }
}
