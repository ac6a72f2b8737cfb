//! In-process stand-in for the remote system, shared by importer tests.

use std::cell::RefCell;

use crate::interfaces::opensilex::{
    ApiError, DataFileDescription, GermplasmSummary, PhenotypingApi, ScientificObjectCreation,
    ScientificObjectSummary,
};

#[derive(Default)]
pub struct RecordingApi {
    pub existing_objects: Vec<ScientificObjectSummary>,
    pub germplasm: Vec<GermplasmSummary>,
    pub fail_germplasm: bool,
    pub created: RefCell<Vec<ScientificObjectCreation>>,
    pub uploaded: RefCell<Vec<(DataFileDescription, String, Vec<u8>)>>,
}

impl RecordingApi {
    pub fn with_object(uri: &str, name: &str) -> Self {
        RecordingApi {
            existing_objects: vec![ScientificObjectSummary {
                uri: uri.to_string(),
                name: name.to_string(),
            }],
            ..Default::default()
        }
    }

    pub fn with_germplasm(uri: &str, code: &str) -> Self {
        RecordingApi {
            germplasm: vec![GermplasmSummary {
                uri: uri.to_string(),
                code: Some(code.to_string()),
                name: None,
            }],
            ..Default::default()
        }
    }
}

impl PhenotypingApi for RecordingApi {
    fn create_scientific_object(
        &self,
        request: &ScientificObjectCreation,
    ) -> Result<String, ApiError> {
        self.created.borrow_mut().push(request.clone());
        Ok(format!("dev:so/{}", self.created.borrow().len()))
    }

    fn search_scientific_objects(
        &self,
        name_pattern: &str,
    ) -> Result<Vec<ScientificObjectSummary>, ApiError> {
        Ok(self
            .existing_objects
            .iter()
            .filter(|o| o.name.contains(name_pattern))
            .cloned()
            .collect())
    }

    // Deliberately ignores the code filter: the real registry may return
    // looser matches, and callers must do their own exact-code check.
    fn search_germplasm(
        &self,
        _code: Option<&str>,
        _species: Option<&str>,
    ) -> Result<Vec<GermplasmSummary>, ApiError> {
        if self.fail_germplasm {
            return Err(ApiError::EmptyResult);
        }
        Ok(self.germplasm.clone())
    }

    fn post_data_file(
        &self,
        description: &DataFileDescription,
        file_name: &str,
        payload: &[u8],
    ) -> Result<String, ApiError> {
        self.uploaded.borrow_mut().push((
            description.clone(),
            file_name.to_string(),
            payload.to_vec(),
        ));
        Ok(format!("dev:file/{}", self.uploaded.borrow().len()))
    }
}
