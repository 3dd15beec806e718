use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

fn main() {
    // Askama compiles templates in; without these hints edits leave a stale binary.
    let mut templates = Vec::new();
    collect_templates(Path::new("templates"), &mut templates);
    for template in &templates {
        println!("cargo:rerun-if-changed={}", template.display());
    }
    println!("cargo:rerun-if-changed=build.rs");

    // Rendered in the page footer to tell deployments apart.
    let build_id = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "dev".to_string());
    println!("cargo:rustc-env=VOLLEY_BUILD_ID={}", build_id);
}

fn collect_templates(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for path in entries.flatten().map(|e| e.path()) {
        if path.is_dir() {
            collect_templates(&path, out);
        } else if path.extension().and_then(|s| s.to_str()) == Some("html") {
            out.push(path);
        }
    }
}
