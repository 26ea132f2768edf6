use std::{
    env,
    fmt::Write as _,
    fs,
    path::{Path, PathBuf},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let root = manifest_dir.join("test-data");
    println!("cargo:rerun-if-changed={}", root.display());

    let mut files = Vec::new();
    collect_files(&root, &mut files)?;
    files.sort();

    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    let dest = out_dir.join("generated_tests.rs");

    let mut buffer = String::new();
    writeln!(buffer, "use crate::testing::check_transcript;")?;
    writeln!(buffer)?;

    for path in files {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("transcript");
        let ident = sanitize_ident(stem);
        let rel = path.strip_prefix(&manifest_dir)?;
        let rel_str = to_unix_path(rel);

        writeln!(buffer, "#[test]")?;
        writeln!(buffer, "fn transcript_{ident}() {{")?;
        writeln!(
            buffer,
            "    let input = include_str!(concat!(env!(\"CARGO_MANIFEST_DIR\"), \"/{rel_str}\"));"
        )?;
        writeln!(buffer, "    check_transcript(\"{stem}\", input);")?;
        writeln!(buffer, "}}")?;
        writeln!(buffer)?;
    }

    fs::write(dest, buffer)?;
    Ok(())
}

fn sanitize_ident(stem: &str) -> String {
    let mut ident = String::new();
    for ch in stem.chars() {
        ident.push(if ch.is_ascii_alphanumeric() { ch } else { '_' });
    }
    if ident.is_empty() {
        ident.push_str("transcript");
    }
    ident
}

fn to_unix_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn collect_files(root: &Path, out: &mut Vec<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    if !root.exists() {
        return Ok(());
    }
    for entry in fs::read_dir(root)? {
        let path = entry?.path();
        if path.is_dir() {
            println!("cargo:rerun-if-changed={}", path.display());
            collect_files(&path, out)?;
        } else if path.extension().and_then(|s| s.to_str()) == Some("txt") {
            println!("cargo:rerun-if-changed={}", path.display());
            out.push(path);
        }
    }
    Ok(())
}
