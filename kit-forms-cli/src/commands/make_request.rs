use console::style;
use convert_case::{Case, Casing};
use pluralizer::pluralize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::templates;

const DEFAULT_REQUESTS_PATH: &str = "src/requests";

/// Names derived from the requested name
#[derive(Debug, PartialEq)]
pub struct RequestNames {
    /// `UpdatePostRequest`
    pub struct_name: String,
    /// `UpdatePostRules`
    pub rules_name: String,
    /// `update_post_request`
    pub file_name: String,
}

#[derive(Debug, PartialEq)]
pub enum Outcome {
    Created {
        request_file: PathBuf,
        mod_file: PathBuf,
        mod_created: bool,
    },
    /// The file or its module declaration is already there; nothing was written
    AlreadyExists(PathBuf),
}

pub fn run(name: String, path: Option<String>) -> Result<(), String> {
    let names = request_names(&name)?;
    let requests_dir = destination(path);

    match generate(&names, &requests_dir)? {
        Outcome::AlreadyExists(existing) => {
            println!(
                "{} Request '{}' already exists at {}",
                style("Info:").yellow().bold(),
                names.struct_name,
                existing.display()
            );
        }
        Outcome::Created {
            request_file,
            mod_file,
            mod_created,
        } => {
            println!("{} Created {}", style("✓").green(), request_file.display());
            let verb = if mod_created { "Created" } else { "Updated" };
            println!("{} {} {}", style("✓").green(), verb, mod_file.display());

            println!();
            println!(
                "FormRequest {} created successfully!",
                style(&names.struct_name).cyan().bold()
            );
            println!();
            println!("Usage in a controller:");
            println!("  {}", style("#[handler]").dim());
            println!(
                "  {}",
                style(format!(
                    "pub async fn store(form: Form<{}>) -> Response {{",
                    names.struct_name
                ))
                .dim()
            );
            println!(
                "      {}",
                style("// 403 when unauthorized, 422 when invalid").dim()
            );
            println!("  {}", style("}").dim());
            println!();
        }
    }

    Ok(())
}

/// `--path`, else `KIT_REQUESTS_PATH` from the environment or `.env`, else `src/requests`
pub fn destination(path: Option<String>) -> PathBuf {
    let configured = path.or_else(|| {
        let _ = dotenvy::dotenv();
        std::env::var("KIT_REQUESTS_PATH").ok()
    });

    PathBuf::from(
        configured
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_REQUESTS_PATH.to_string()),
    )
}

/// Singular PascalCase name with a single `Request` suffix
pub fn request_names(name: &str) -> Result<RequestNames, String> {
    let snake = name.trim().to_case(Case::Snake);
    let base = match snake.strip_suffix("_request") {
        Some(base) => base,
        None if snake == "request" => "",
        None => snake.as_str(),
    };

    let mut words: Vec<&str> = base.split('_').filter(|w| !w.is_empty()).collect();
    let Some(last) = words.pop() else {
        return Err(format!("'{}' is not a valid request name", name));
    };
    let singular = pluralize(last, 1, false);
    let base = if words.is_empty() {
        singular
    } else {
        format!("{}_{}", words.join("_"), singular)
    };

    if !is_valid_identifier(&base) {
        return Err(format!("'{}' is not a valid request name", name));
    }

    let pascal = base.to_case(Case::Pascal);
    Ok(RequestNames {
        struct_name: format!("{}Request", pascal),
        rules_name: format!("{}Rules", pascal),
        file_name: format!("{}_request", base),
    })
}

/// Write the request file and register it in `mod.rs`
///
/// Existing files are never overwritten.
pub fn generate(names: &RequestNames, requests_dir: &Path) -> Result<Outcome, String> {
    let request_file = requests_dir.join(format!("{}.rs", names.file_name));
    let mod_file = requests_dir.join("mod.rs");

    if request_file.exists() {
        return Ok(Outcome::AlreadyExists(request_file));
    }

    let mod_content = if mod_file.exists() {
        let content = fs::read_to_string(&mod_file)
            .map_err(|e| format!("Failed to read {}: {}", mod_file.display(), e))?;
        if declares_module(&content, &names.file_name) {
            return Ok(Outcome::AlreadyExists(mod_file));
        }
        Some(content)
    } else {
        None
    };

    fs::create_dir_all(requests_dir)
        .map_err(|e| format!("Failed to create {}: {}", requests_dir.display(), e))?;

    fs::write(
        &request_file,
        templates::request_template(&names.struct_name, &names.rules_name),
    )
    .map_err(|e| format!("Failed to write {}: {}", request_file.display(), e))?;

    let mod_created = mod_content.is_none();
    let updated = update_mod_file(
        mod_content.as_deref().unwrap_or(""),
        &names.file_name,
        &names.struct_name,
    );
    fs::write(&mod_file, updated)
        .map_err(|e| format!("Failed to write {}: {}", mod_file.display(), e))?;

    Ok(Outcome::Created {
        request_file,
        mod_file,
        mod_created,
    })
}

fn declares_module(content: &str, file_name: &str) -> bool {
    let mod_decl = format!("mod {};", file_name);
    content
        .lines()
        .any(|line| line.trim().trim_start_matches("pub ") == mod_decl)
}

fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();

    // First character must be letter or underscore
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }

    chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Add `pub mod` after the last `pub mod` line and `pub use` after the last `pub use` line
fn update_mod_file(content: &str, file_name: &str, struct_name: &str) -> String {
    let mut lines: Vec<String> = content.lines().map(str::to_string).collect();

    let mod_at = lines
        .iter()
        .rposition(|l| l.trim_start().starts_with("pub mod "))
        .map(|i| i + 1)
        .unwrap_or(0);
    lines.insert(mod_at, format!("pub mod {};", file_name));

    let use_line = format!("pub use {}::{};", file_name, struct_name);
    match lines
        .iter()
        .rposition(|l| l.trim_start().starts_with("pub use "))
    {
        Some(i) => lines.insert(i + 1, use_line),
        None => {
            if lines.last().is_some_and(|l| !l.is_empty()) {
                lines.push(String::new());
            }
            lines.push(use_line);
        }
    }

    let mut updated = lines.join("\n");
    updated.push('\n');
    updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_names_are_singular_pascal_with_one_suffix() {
        let names = request_names("posts").unwrap();
        assert_eq!(names.struct_name, "PostRequest");
        assert_eq!(names.rules_name, "PostRules");
        assert_eq!(names.file_name, "post_request");

        assert_eq!(
            request_names("UpdatePostRequest").unwrap().struct_name,
            "UpdatePostRequest"
        );
        assert_eq!(
            request_names("update_users").unwrap().struct_name,
            "UpdateUserRequest"
        );
    }

    #[test]
    fn test_invalid_names_are_rejected() {
        assert!(request_names("Request").is_err());
        assert!(request_names("").is_err());
        assert!(request_names("9lives").is_err());
    }

    #[test]
    fn test_generate_writes_file_and_mod() {
        let dir = tempfile::tempdir().unwrap();
        let names = request_names("UpdatePost").unwrap();

        let outcome = generate(&names, dir.path()).unwrap();

        assert!(matches!(outcome, Outcome::Created { mod_created: true, .. }));
        let source = fs::read_to_string(dir.path().join("update_post_request.rs")).unwrap();
        assert!(source.contains("pub struct UpdatePostRequest;"));
        assert!(source.contains("type Schema = UpdatePostRules;"));
        assert!(!source.contains("{{"));
        assert_eq!(
            fs::read_to_string(dir.path().join("mod.rs")).unwrap(),
            "pub mod update_post_request;\n\npub use update_post_request::UpdatePostRequest;\n"
        );
    }

    #[test]
    fn test_generate_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let names = request_names("UpdatePost").unwrap();
        let file = dir.path().join("update_post_request.rs");
        fs::write(&file, "// hand written").unwrap();

        let outcome = generate(&names, dir.path()).unwrap();

        assert_eq!(outcome, Outcome::AlreadyExists(file.clone()));
        assert_eq!(fs::read_to_string(file).unwrap(), "// hand written");
    }

    #[test]
    fn test_update_mod_file_keeps_sections() {
        let updated = update_mod_file(
            "pub mod post_request;\n\npub use post_request::PostRequest;\n",
            "user_request",
            "UserRequest",
        );

        assert_eq!(
            updated,
            "pub mod post_request;\npub mod user_request;\n\npub use post_request::PostRequest;\npub use user_request::UserRequest;\n"
        );
    }

    #[test]
    fn test_explicit_path_wins() {
        assert_eq!(
            destination(Some("app/requests".to_string())),
            PathBuf::from("app/requests")
        );
    }
}
