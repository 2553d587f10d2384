//! proto3 field syntax

use ir::Field;

/// Import declaring the `(tagger.tags)` field option.
pub const TAGGER_IMPORT: &str = "tagger/tagger.proto";

/// Import declaring `google.protobuf.Any`.
pub const ANY_IMPORT: &str = "google/protobuf/any.proto";

/// Escape double quotes for use inside a proto string literal.
pub fn escape_quotes(tags: &str) -> String { tags.replace('"', "\\\"") }

/// Render one field declaration, without indentation or newline.
///
/// The tag option is appended only when `use_tags` is set and the field
/// carries a tag.
pub fn field_line(field: &Field, use_tags: bool) -> String {
    let ty = match (&field.map_key, field.is_map) {
        (Some(key), true) => format!("map<{}, {}>", key, field.type_name),
        _ if field.is_repeated => format!("repeated {}", field.type_name),
        _ => field.type_name.clone(),
    };
    let mut line = format!("{} {} = {}", ty, field.field_name, field.order);
    if use_tags && !field.tags.is_empty() {
        line.push_str(&format!(" [(tagger.tags) = \"{}\"]", escape_quotes(&field.tags)));
    }
    line.push(';');
    line
}
