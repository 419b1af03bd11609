use error_stack::Report;
use thiserror::Error;
use validator::ValidationErrors;

use super::validation::flatten;

#[derive(Debug, Error)]
#[error("Invalid given data occurred")]
pub struct Wrapper;

pub trait IntoValidatorReport<T> {
    fn into_validator_report(self) -> error_stack::Result<T, Wrapper>;
}

impl<T> IntoValidatorReport<T> for Result<T, ValidationErrors> {
    fn into_validator_report(self) -> error_stack::Result<T, Wrapper> {
        self.map_err(|errors| {
            flatten(&errors)
                .into_iter()
                .fold(Report::new(Wrapper), Report::attach_printable)
        })
    }
}
