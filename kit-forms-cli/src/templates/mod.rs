//! File templates used by the generators

/// Form request stub for make:request
pub fn request_template(struct_name: &str, rules_name: &str) -> String {
    include_str!("files/request.rs.tpl")
        .replace("{{struct_name}}", struct_name)
        .replace("{{rules_name}}", rules_name)
}
