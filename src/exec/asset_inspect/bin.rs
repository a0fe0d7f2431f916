use std::{env, fmt::Write, path::PathBuf, process};

use kura::engine::ProjectLoader;
use kura::tree::AssetTree;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "kura_assets".to_string());

    let rest: Vec<String> = args.collect();
    if rest.is_empty() {
        print_usage(&program);
        return Err("missing project root path".to_string());
    }

    let mut root: Option<PathBuf> = None;
    let mut module_filter: Option<String> = None;
    let mut show_ids = false;

    let mut iter = rest.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_usage(&program);
                return Ok(());
            }
            "--module" => {
                let value = iter
                    .next()
                    .ok_or_else(|| "--module requires a module id".to_string())?;
                module_filter = Some(value);
            }
            "--ids" => {
                show_ids = true;
            }
            _ => {
                if root.is_none() {
                    root = Some(PathBuf::from(arg));
                } else {
                    print_usage(&program);
                    return Err(format!("unexpected argument: {arg}"));
                }
            }
        }
    }

    let Some(root) = root else {
        print_usage(&program);
        return Err("missing project root path".to_string());
    };

    let link = ProjectLoader::load_blocking(&root)
        .map_err(|err| format!("failed to open {}: {err}", root.display()))?;
    let tree = AssetTree::build(&link);

    let output = render_tree(&root, &tree, module_filter.as_deref(), show_ids)?;
    print!("{output}");
    Ok(())
}

/// Formats the hierarchy for printing. An unknown module filter fails before
/// any output is produced.
fn render_tree(
    root: &std::path::Path,
    tree: &AssetTree,
    module_filter: Option<&str>,
    show_ids: bool,
) -> Result<String, String> {
    if let Some(filter) = module_filter {
        if !tree.modules.iter().any(|module| module.module_id == filter) {
            return Err(format!("module '{filter}' not found in project"));
        }
    }

    let mut out = String::new();
    let _ = writeln!(out, "Project: {}", root.display());
    let _ = writeln!(out, "Modules: {}", tree.modules.len());
    let _ = writeln!(out, "Assets:  {}", tree.asset_count());

    for module in &tree.modules {
        if let Some(filter) = module_filter {
            if module.module_id != filter {
                continue;
            }
        }

        let _ = writeln!(out, "\n{} (v{})", module.module_id, module.version);
        for category in &module.categories {
            let _ = writeln!(out, "  {} ({})", category.label, category.assets.len());
            for asset in &category.assets {
                if show_ids {
                    let _ = writeln!(out, "    {:<24}  {}", asset.name, asset.asset_id);
                } else {
                    let _ = writeln!(out, "    {}", asset.name);
                }
            }
        }
    }

    Ok(out)
}

fn print_usage(program: &str) {
    println!("Usage: {program} <project_root> [--module <id>] [--ids]");
    println!();
    println!("Prints the module/category/asset hierarchy of a kura project.");
    println!("  --module <id>  only print the named module");
    println!("  --ids          include full asset identifiers");
}
