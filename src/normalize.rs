//! Canonicalization of a coverage document for CI annotation tooling.
//!
//! The normalizer restructures the tree to one package per source file,
//! rewrites the source root to the CI workspace, strips the build-root
//! prefix from filenames, zeroes the timestamp, and serializes with a
//! fixed root attribute order. The output is deterministic: normalizing a
//! document twice yields byte-identical results.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::writer::Writer;

use crate::document::{Attrs, CoverageDocument, Package};
use crate::error::{CovError, Result};

/// The source root every normalized document declares, matching the
/// GitHub Actions checkout location.
pub const WORKSPACE_ROOT: &str = "/github/workspace";

/// Build-root prefixes stripped from class filenames. Both denote the
/// docker workdir, with and without the leading separator.
const BUILD_ROOT_PREFIXES: [&str; 2] = ["/app/", "app/"];

/// Root attribute serialization order. Downstream summary tooling reads
/// the `<coverage>` attributes by convention rather than by name, so this
/// exact order is a correctness requirement. Missing attributes are
/// serialized with the default.
const ROOT_ATTR_ORDER: [(&str, &str); 9] = [
    ("lines-valid", "0"),
    ("lines-covered", "0"),
    ("line-rate", "0"),
    ("branches-valid", "0"),
    ("branches-covered", "0"),
    ("branch-rate", "0"),
    ("timestamp", "0"),
    ("complexity", "0"),
    ("version", "0"),
];

/// Rate attributes copied from each class onto its synthesized package.
const PACKAGE_RATE_ATTRS: [&str; 3] = ["line-rate", "branch-rate", "complexity"];

/// Restructure the document in place: one package per class, package name
/// equal to the class's workspace-relative filename. Returns the number of
/// classes found.
///
/// Fails with `MissingStructure` when the document has no `<packages>`
/// container at all; an empty container is fine.
pub fn normalize(doc: &mut CoverageDocument) -> Result<usize> {
    let packages = doc
        .packages
        .take()
        .ok_or(CovError::MissingStructure("packages"))?;

    doc.sources = vec![WORKSPACE_ROOT.to_string()];

    // Flatten package-major, preserving encounter order.
    let classes: Vec<_> = packages.into_iter().flat_map(|p| p.classes).collect();
    let count = classes.len();

    let mut repackaged = Vec::with_capacity(count);
    for mut class in classes {
        let filename = sanitize_filename(class.filename());
        class.attrs.set("filename", &filename);

        let mut attrs = Attrs::new();
        attrs.set("name", &filename);
        for key in PACKAGE_RATE_ATTRS {
            attrs.set(key, class.attrs.get(key).unwrap_or("0.0"));
        }

        repackaged.push(Package {
            attrs,
            classes: vec![class],
        });
    }

    doc.packages = Some(repackaged);
    doc.attrs.set("timestamp", "0");

    Ok(count)
}

/// Strip the build-root prefix from a filename, making it
/// workspace-relative. Filenames matching neither prefix pass through
/// unchanged; at most one prefix is removed.
#[must_use]
pub fn sanitize_filename(filename: &str) -> String {
    for prefix in BUILD_ROOT_PREFIXES {
        if let Some(rest) = filename.strip_prefix(prefix) {
            return rest.to_string();
        }
    }
    filename.to_string()
}

/// Serialize the document to its canonical byte form: single UTF-8 XML
/// declaration, fixed root attribute order, pretty-printed with two-space
/// indentation and no blank lines.
pub fn to_canonical_xml(doc: &CoverageDocument) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("coverage");
    for (key, value) in ordered_root_attrs(&doc.attrs) {
        root.push_attribute((key, value));
    }
    writer.write_event(Event::Start(root))?;

    if doc.sources.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new("sources")))?;
    } else {
        writer.write_event(Event::Start(BytesStart::new("sources")))?;
        for source in &doc.sources {
            writer.write_event(Event::Start(BytesStart::new("source")))?;
            writer.write_event(Event::Text(BytesText::new(source)))?;
            writer.write_event(Event::End(BytesEnd::new("source")))?;
        }
        writer.write_event(Event::End(BytesEnd::new("sources")))?;
    }

    let packages = doc.packages.as_deref().unwrap_or(&[]);
    if packages.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new("packages")))?;
    } else {
        writer.write_event(Event::Start(BytesStart::new("packages")))?;
        for package in packages {
            write_package(&mut writer, package)?;
        }
        writer.write_event(Event::End(BytesEnd::new("packages")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("coverage")))?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok(bytes)
}

fn write_package(writer: &mut Writer<Vec<u8>>, package: &Package) -> Result<()> {
    let mut pkg = BytesStart::new("package");
    for (key, value) in package.attrs.iter() {
        pkg.push_attribute((key, value));
    }
    writer.write_event(Event::Start(pkg))?;

    if package.classes.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new("classes")))?;
    } else {
        writer.write_event(Event::Start(BytesStart::new("classes")))?;
        for class in &package.classes {
            let mut cls = BytesStart::new("class");
            for (key, value) in class.attrs.iter() {
                cls.push_attribute((key, value));
            }
            match &class.lines {
                None => {
                    writer.write_event(Event::Empty(cls))?;
                }
                Some(lines) => {
                    writer.write_event(Event::Start(cls))?;
                    if lines.is_empty() {
                        writer.write_event(Event::Empty(BytesStart::new("lines")))?;
                    } else {
                        writer.write_event(Event::Start(BytesStart::new("lines")))?;
                        for line in lines {
                            let mut el = BytesStart::new("line");
                            for (key, value) in line.attrs.iter() {
                                el.push_attribute((key, value));
                            }
                            writer.write_event(Event::Empty(el))?;
                        }
                        writer.write_event(Event::End(BytesEnd::new("lines")))?;
                    }
                    writer.write_event(Event::End(BytesEnd::new("class")))?;
                }
            }
        }
        writer.write_event(Event::End(BytesEnd::new("classes")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("package")))?;
    Ok(())
}

/// The fixed 9-key root attribute order with defaults, followed by any
/// attributes not in the list, in their original relative order.
fn ordered_root_attrs(attrs: &Attrs) -> Vec<(&str, &str)> {
    let mut out: Vec<(&str, &str)> = ROOT_ATTR_ORDER
        .iter()
        .map(|&(key, default)| (key, attrs.get(key).unwrap_or(default)))
        .collect();
    for (key, value) in attrs.iter() {
        if !ROOT_ATTR_ORDER.iter().any(|&(k, _)| k == key) {
            out.push((key, value));
        }
    }
    out
}
