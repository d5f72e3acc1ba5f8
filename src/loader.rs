//! Streaming loader for Cobertura XML coverage reports.
//!
//! Cobertura XML structure:
//!   <coverage line-rate="..." lines-valid="..." ...>
//!     <sources><source>...</source></sources>
//!     <packages>
//!       <package name="..." line-rate="...">
//!         <classes>
//!           <class name="..." filename="..." line-rate="...">
//!             <methods>...</methods>
//!             <lines><line number="..." hits="..."/></lines>
//!           </class>
//!         </classes>
//!       </package>
//!     </packages>
//!   </coverage>
//!
//! Unlike a format converter, the loader keeps attribute strings verbatim
//! and in order so the document can be re-serialized without reformatting
//! values it does not touch. `<methods>` subtrees are skipped: the line
//! records that matter are the class-level `<lines>`, and method-level
//! `<lines>` duplicates must not leak into them.

use std::path::Path;
use std::str;

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::document::{Attrs, ClassEntry, CoverageDocument, LineRecord, Package};
use crate::error::{CovError, Result};

/// Check the path exists, then read and parse it.
pub fn load_file(path: &Path) -> Result<CoverageDocument> {
    if !path.exists() {
        return Err(CovError::NotFound(path.to_path_buf()));
    }
    let content = std::fs::read(path)?;
    load(&content)
}

/// Parse a coverage document from bytes.
pub fn load(input: &[u8]) -> Result<CoverageDocument> {
    let mut reader = Reader::from_reader(input);
    reader.trim_text(true);

    let mut doc = CoverageDocument::default();
    let mut buf = Vec::new();

    let mut saw_root = false;
    let mut current_package: Option<Package> = None;
    let mut current_class: Option<ClassEntry> = None;
    let mut in_source = false;
    let mut in_methods = false;
    let mut in_class_lines = false;

    loop {
        let event = reader.read_event_into(&mut buf);
        let is_start_event = matches!(&event, Ok(Event::Start(_)));
        match event {
            Err(e) => return Err(e.into()),
            Ok(Event::Eof) => break,
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                let local_name = e.name();
                let local = local_name.as_ref().to_vec();

                match local.as_slice() {
                    b"coverage" => {
                        saw_root = true;
                        doc.attrs = attr_list(e);
                    }
                    b"source" => {
                        // Only set in_source for Start events; self-closing
                        // <source/> has no text content and no corresponding
                        // End event, so setting the flag would cause the next
                        // unrelated Text event to be captured.
                        if is_start_event {
                            in_source = true;
                        }
                    }
                    b"packages" => {
                        doc.packages.get_or_insert_with(Vec::new);
                    }
                    b"package" => {
                        let pkg = Package {
                            attrs: attr_list(e),
                            classes: Vec::new(),
                        };
                        if is_start_event {
                            current_package = Some(pkg);
                        } else {
                            doc.packages.get_or_insert_with(Vec::new).push(pkg);
                        }
                    }
                    b"class" if !in_methods => {
                        let class = ClassEntry {
                            attrs: attr_list(e),
                            lines: None,
                        };
                        if is_start_event {
                            current_class = Some(class);
                        } else if let Some(pkg) = current_package.as_mut() {
                            pkg.classes.push(class);
                        }
                    }
                    b"methods" => {
                        if is_start_event {
                            in_methods = true;
                        }
                    }
                    b"lines" if !in_methods => {
                        if let Some(class) = current_class.as_mut() {
                            class.lines.get_or_insert_with(Vec::new);
                            if is_start_event {
                                in_class_lines = true;
                            }
                        }
                    }
                    b"line" if in_class_lines && !in_methods => {
                        if let Some(class) = current_class.as_mut() {
                            let record = LineRecord { attrs: attr_list(e) };
                            class.lines.get_or_insert_with(Vec::new).push(record);
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(ref e)) => {
                if in_source {
                    if let Ok(text) = e.unescape() {
                        doc.sources.push(text.to_string());
                    }
                    in_source = false;
                }
            }
            Ok(Event::End(ref e)) => {
                let local_name = e.name();
                let local = local_name.as_ref().to_vec();
                match local.as_slice() {
                    b"source" => {
                        in_source = false;
                    }
                    b"package" => {
                        if let Some(pkg) = current_package.take() {
                            doc.packages.get_or_insert_with(Vec::new).push(pkg);
                        }
                    }
                    b"class" if !in_methods => {
                        if let (Some(pkg), Some(class)) =
                            (current_package.as_mut(), current_class.take())
                        {
                            pkg.classes.push(class);
                        }
                    }
                    b"methods" => {
                        in_methods = false;
                    }
                    b"lines" if !in_methods => {
                        in_class_lines = false;
                    }
                    _ => {}
                }
            }
            _ => {}
        }
        buf.clear();
    }

    if !saw_root {
        return Err(CovError::Malformed(
            "missing <coverage> root element".to_string(),
        ));
    }

    Ok(doc)
}

/// Extract attributes from an XML element, preserving their order.
fn attr_list(e: &quick_xml::events::BytesStart) -> Attrs {
    let mut attrs = Attrs::new();
    for attr in e.attributes().filter_map(|a| a.ok()) {
        let key = match str::from_utf8(attr.key.local_name().into_inner()) {
            Ok(k) => k.to_string(),
            Err(_) => continue,
        };
        let value = match attr.unescape_value() {
            Ok(v) => v.to_string(),
            Err(_) => continue,
        };
        attrs.push(key, value);
    }
    attrs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_basic() {
        let xml = br#"<?xml version="1.0" ?>
<coverage line-rate="0.9" lines-valid="20" lines-covered="18" timestamp="1718035200">
  <sources><source>/app</source></sources>
  <packages>
    <package name="app" line-rate="0.9">
      <classes>
        <class name="a.py" filename="/app/a.py" line-rate="0.8">
          <methods/>
          <lines>
            <line number="1" hits="1"/>
            <line number="2" hits="0"/>
          </lines>
        </class>
      </classes>
    </package>
  </packages>
</coverage>"#;

        let doc = load(xml).unwrap();
        assert_eq!(doc.attrs.get("line-rate"), Some("0.9"));
        assert_eq!(doc.sources, vec!["/app".to_string()]);

        let packages = doc.packages.as_ref().unwrap();
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].attrs.get("name"), Some("app"));
        assert_eq!(packages[0].classes.len(), 1);

        let class = &packages[0].classes[0];
        assert_eq!(class.filename(), "/app/a.py");
        let lines = class.lines.as_ref().unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].number(), Some(1));
        assert_eq!(lines[1].hits(), 0);
    }

    #[test]
    fn test_load_ignores_method_lines() {
        let xml = br#"<coverage>
  <packages><package name="p"><classes>
    <class name="a" filename="a.py">
      <methods>
        <method name="f"><lines><line number="5" hits="1"/></lines></method>
      </methods>
      <lines><line number="1" hits="1"/></lines>
    </class>
  </classes></package></packages>
</coverage>"#;

        let doc = load(xml).unwrap();
        let class = doc.classes().next().unwrap();
        let lines = class.lines.as_ref().unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].number(), Some(1));
    }

    #[test]
    fn test_load_missing_optional_elements() {
        // No <sources>, no <lines> on the class.
        let xml = br#"<coverage line-rate="1.0">
  <packages><package name="p"><classes>
    <class name="a" filename="a.py" line-rate="1.0"/>
  </classes></package></packages>
</coverage>"#;

        let doc = load(xml).unwrap();
        assert!(doc.sources.is_empty());
        let class = doc.classes().next().unwrap();
        assert!(class.lines.is_none());
    }

    #[test]
    fn test_load_no_packages_container() {
        let doc = load(b"<coverage line-rate=\"0.5\"/>").unwrap();
        assert!(doc.packages.is_none());
        assert_eq!(doc.class_count(), 0);
    }

    #[test]
    fn test_load_empty_self_closing_source() {
        // A self-closing <source/> must not capture unrelated text.
        let xml = br#"<coverage>
  <sources><source/></sources>
  <packages/>
</coverage>"#;
        let doc = load(xml).unwrap();
        assert!(doc.sources.is_empty());
    }

    #[test]
    fn test_load_malformed() {
        let result = load(b"<coverage><packages></coverage>");
        assert!(matches!(result, Err(CovError::Malformed(_))));
    }

    #[test]
    fn test_load_not_xml() {
        let result = load(b"this is not xml at all");
        assert!(matches!(result, Err(CovError::Malformed(_))));
    }
}
