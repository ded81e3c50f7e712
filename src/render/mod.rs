//! Document loading and template rendering.
//!
//! Templates are Tera source with Jinja-style block handling: a `{% ... %}`
//! tag swallows the newline that immediately follows it, and indentation in
//! front of a tag on an otherwise-empty line prefix is stripped. Both are
//! applied by rewriting the template source before registration.

use std::path::{Path, PathBuf};
use tera::{Context, Tera};
use thiserror::Error;

use crate::models::DeviceDocument;

/// Device document could not be read or parsed. Terminal for a one-shot
/// render; the caller must halt.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read device document {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse device document {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

/// Template file missing or syntactically invalid
#[derive(Debug, Error)]
pub enum TemplateLoadError {
    #[error("failed to read template {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid template {path}: {source}")]
    Syntax { path: PathBuf, source: tera::Error },
}

/// Template referenced data the document does not provide, or applied an
/// operation the template language rejects. No partial output is produced.
#[derive(Debug, Error)]
#[error("template rendering failed: {0}")]
pub struct RenderError(#[from] tera::Error);

/// A parsed template ready to render, registered under its file stem
#[derive(Debug)]
pub struct LoadedTemplate {
    tera: Tera,
    name: String,
}

impl LoadedTemplate {
    /// Build a template from in-memory source, applying the same block
    /// whitespace handling as [`load_template`].
    pub fn from_source(name: &str, source: &str) -> Result<Self, TemplateLoadError> {
        let mut tera = Tera::default();
        tera.add_raw_template(name, &apply_block_trimming(source))
            .map_err(|source| TemplateLoadError::Syntax {
                path: PathBuf::from(name),
                source,
            })?;
        Ok(Self {
            tera,
            name: name.to_string(),
        })
    }
}

/// Deserialize a device document from a YAML file
pub fn load_document(path: impl AsRef<Path>) -> Result<DeviceDocument, LoadError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&raw).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load and parse a template file, registered under its file stem
pub fn load_template(path: impl AsRef<Path>) -> Result<LoadedTemplate, TemplateLoadError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| TemplateLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("template");

    LoadedTemplate::from_source(name, &raw).map_err(|err| match err {
        TemplateLoadError::Syntax { source, .. } => TemplateLoadError::Syntax {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })
}

/// Render a document against a loaded template.
///
/// Every top-level document field enters the template's variable namespace.
/// Referencing a field the document does not carry is an error, not an
/// empty substitution.
pub fn render(document: &DeviceDocument, template: &LoadedTemplate) -> Result<String, RenderError> {
    let context = Context::from_serialize(document)?;
    Ok(template.tera.render(&template.name, &context)?)
}

/// Rewrite template source so `{% ... %}` tags consume the newline that
/// immediately follows them and horizontal whitespace between the start of
/// a line and a tag is stripped.
fn apply_block_trimming(source: &str) -> String {
    let mut result = source.to_string();

    let lstrip = regex_lite::Regex::new(r"(?m)^[ \t]+\{%").ok();
    if let Some(re) = &lstrip {
        result = re.replace_all(&result, "{%").to_string();
    }

    let trim = regex_lite::Regex::new(r"%\}\r?\n").ok();
    if let Some(re) = &trim {
        result = re.replace_all(&result, "%}").to_string();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{normalize, FormData};

    fn core_form() -> FormData {
        [
            ("hostname", "R1"),
            ("device_type", "Core"),
            ("vlans[][id]", "10"),
            ("vlans[][name]", "users"),
            ("ospf_router_id", "1.1.1.1"),
            ("ospf_networks[][prefix]", "10.0.0.0/24"),
            ("ospf_networks[][area]", "0.0.0.0"),
            ("rip_networks[]", "10.9.0.0"),
            ("core_interfaces[][name]", "Ethernet1"),
            ("core_interfaces[][ipv4]", "10.0.0.1/24"),
            ("core_interfaces[][ipv6]", ""),
            ("core_interfaces[][ospf]", "yes"),
            ("core_interfaces[][dhcp_v4]", "1"),
            ("core_interfaces[][dhcp_v6]", ""),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_block_trimming_consumes_tag_newlines() {
        let source = "hostname {{ hostname }}\n{% if vlans %}\nhas vlans\n{% endif %}\n";
        let trimmed = apply_block_trimming(source);
        assert_eq!(
            trimmed,
            "hostname {{ hostname }}\n{% if vlans %}has vlans\n{% endif %}"
        );
    }

    #[test]
    fn test_block_trimming_strips_tag_indentation() {
        let source = "{% for vlan in vlans %}\n   {% if vlan.name %}\nvlan {{ vlan.id }}\n   {% endif %}\n{% endfor %}\n";
        let trimmed = apply_block_trimming(source);
        assert!(trimmed.contains("{% if vlan.name %}vlan {{ vlan.id }}"));
        assert!(!trimmed.contains("   {%"));
    }

    #[test]
    fn test_render_echoes_normalized_fields_verbatim() {
        let document = normalize(&core_form());
        let template = LoadedTemplate::from_source(
            "echo",
            "hostname={{ hostname }}\n\
             type={{ device_type }}\n\
             {% for vlan in vlans %}\n\
             vlan={{ vlan.id }}:{{ vlan.name }}\n\
             {% endfor %}\n\
             router_id={{ ospf.router_id }}\n\
             process_id={{ ospf.process_id }}\n\
             {% for iface in interfaces %}\n\
             iface={{ iface.name }}\n\
             {% endfor %}\n",
        )
        .unwrap();

        let output = render(&document, &template).unwrap();
        assert_eq!(
            output,
            "hostname=R1\n\
             type=Core\n\
             vlan=10:users\n\
             router_id=1.1.1.1\n\
             process_id=1\n\
             iface=Ethernet1\n"
        );
    }

    #[test]
    fn test_render_fails_on_missing_section() {
        // Core documents never carry a bgp section.
        let document = normalize(&core_form());
        let template =
            LoadedTemplate::from_source("bgp", "router bgp {{ bgp.local_as }}\n").unwrap();

        let err = render(&document, &template);
        assert!(err.is_err());
    }

    #[test]
    fn test_conditional_sections_skip_when_absent() {
        let document = normalize(
            &[("hostname", "S1"), ("device_type", "Switch")]
                .into_iter()
                .collect::<FormData>(),
        );
        let template = LoadedTemplate::from_source(
            "cond",
            "hostname {{ hostname }}\n{% if dhcp %}\nhas dhcp\n{% endif %}\ndone\n",
        )
        .unwrap();

        let output = render(&document, &template).unwrap();
        assert_eq!(output, "hostname S1\ndone\n");
    }

    #[test]
    fn test_template_syntax_error_reports_path() {
        let err = LoadedTemplate::from_source("broken", "{% if %}").unwrap_err();
        assert!(matches!(err, TemplateLoadError::Syntax { .. }));
    }

    #[test]
    fn test_load_template_from_repository_fixture() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("templates/arista_eos.tera");
        let template = load_template(&path).unwrap();
        let document = normalize(&core_form());

        let output = render(&document, &template).unwrap();
        assert!(output.contains("hostname R1"));
        assert!(output.contains("vlan 10"));
        assert!(output.contains("interface Ethernet1"));
        assert!(output.contains("router ospf 1"));
        assert!(output.contains("router-id 1.1.1.1"));
    }

    #[test]
    fn test_load_document_missing_file_reports_path() {
        let err = load_document("/nonexistent/R9.yaml").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("/nonexistent/R9.yaml"));
    }
}
