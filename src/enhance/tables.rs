//! Table styling.

use crate::dom::{Dom, Selector};
use crate::error::Result;

/// Classes added to every table (base style and striped rows).
pub const TABLE_CLASSES: [&str; 2] = ["table", "table-striped"];

/// Add [`TABLE_CLASSES`] to every `table`. Returns the number of tables seen.
pub fn style_tables(dom: &mut Dom) -> Result<usize> {
    let tables = dom.select(dom.document(), &Selector::parse("table")?);
    for &table in &tables {
        for class in TABLE_CLASSES {
            dom.add_class(table, class);
        }
    }
    Ok(tables.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_document;

    #[test]
    fn test_existing_classes_are_kept() {
        let mut dom = parse_document(r#"<table class="wide table"></table><table></table>"#);

        assert_eq!(style_tables(&mut dom).unwrap(), 2);

        let tables = dom.select(dom.document(), &Selector::parse("table").unwrap());
        assert_eq!(dom.get_attr(tables[0], "class"), Some("wide table table-striped"));
        assert_eq!(dom.get_attr(tables[1], "class"), Some("table table-striped"));
    }

    #[test]
    fn test_page_without_tables() {
        let mut dom = parse_document("<p>text</p>");
        assert_eq!(style_tables(&mut dom).unwrap(), 0);
    }
}
