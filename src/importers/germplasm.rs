use crate::interfaces::opensilex::PhenotypingApi;

/// Look up a germplasm URI for a varietal code.
///
/// Only a result whose code equals the input exactly counts as a match.
/// Returns `None` when the registry call fails or nothing matches; both
/// cases are logged and the caller proceeds without a germplasm reference.
pub fn resolve_germplasm(
    api: &impl PhenotypingApi,
    code: &str,
    species: Option<&str>,
) -> Option<String> {
    log::debug!("Searching germplasm for code {code}");
    let results = match api.search_germplasm(Some(code), species) {
        Ok(results) => results,
        Err(e) => {
            log::error!("Germplasm search failed for code {code}: {e}");
            return None;
        }
    };

    match results.into_iter().find(|g| g.code.as_deref() == Some(code)) {
        Some(germplasm) => {
            log::debug!("Code {code} resolved to germplasm {}", germplasm.uri);
            Some(germplasm.uri)
        }
        None => {
            log::warn!("No germplasm found for code {code}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::importers::testing::RecordingApi;
    use crate::interfaces::opensilex::GermplasmSummary;

    #[test]
    fn exact_code_match_resolves() {
        let api = RecordingApi::with_germplasm("dev:germplasm/g689", "689");
        assert_eq!(
            resolve_germplasm(&api, "689", None),
            Some("dev:germplasm/g689".to_string())
        );
    }

    #[test]
    fn near_miss_codes_do_not_resolve() {
        let api = RecordingApi {
            germplasm: vec![GermplasmSummary {
                uri: "dev:germplasm/g6890".to_string(),
                code: Some("6890".to_string()),
                name: None,
            }],
            ..Default::default()
        };
        // The registry may return looser matches; only an exact code wins
        assert_eq!(resolve_germplasm(&api, "689", None), None);
    }

    #[test]
    fn registry_failure_resolves_to_none() {
        let api = RecordingApi {
            fail_germplasm: true,
            ..Default::default()
        };
        assert_eq!(resolve_germplasm(&api, "689", None), None);
    }
}
