use error_stack::{Context, Report};

// Figment errors carry the offending key and its source (file or
// environment) separately from the message, so both have to be
// attached to the report to make sense of a bad configuration.
pub trait FigmentErrorAttachable<T: Context> {
    fn attach_figment_error(self, err: figment::Error) -> Report<T>;
}

impl<T: Context> FigmentErrorAttachable<T> for Report<T> {
    fn attach_figment_error(self, error: figment::Error) -> Report<T> {
        let mut this = self;
        for e in error {
            this = this.attach_printable(e.kind.to_string());

            if let (Some(profile), Some(md)) = (&e.profile, &e.metadata) {
                if !e.path.is_empty() {
                    let key = md.interpolate(profile, &e.path);
                    this = this.attach_printable(format!("for key {key:?}"));
                }
            }

            if let Some(md) = &e.metadata {
                if let Some(source) = &md.source {
                    this = this.attach_printable(format!("in {source} {}", md.name));
                } else {
                    this = this.attach_printable(format!("in {}", md.name));
                }
            }
        }
        this
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::{providers::Serialized, Figment};
    use serde::Deserialize;
    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("could not load")]
    struct LoadError;

    #[test]
    fn should_attach_figment_error_kind() {
        #[derive(Debug, Deserialize)]
        struct Config {
            #[allow(unused)]
            port: u16,
        }

        let error = Figment::new()
            .merge(Serialized::default("port", "not a number"))
            .extract::<Config>()
            .unwrap_err();

        let report = Report::new(LoadError).attach_figment_error(error);
        let rendered = format!("{report:?}");
        assert!(rendered.contains("u16"), "{rendered}");
    }
}
