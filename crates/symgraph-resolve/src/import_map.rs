//! Import-Resolution-Map Builder (spec §4.5): per file, `simpleName -> FQN`.

use std::collections::HashMap;
use symgraph_core::model::{Import, ParsedFile};
use symgraph_parsers::module_path::{infer_module_path, ModulePathOptions};

#[derive(Debug, Default)]
pub struct ImportMap {
    pub simple_name_to_fqn: HashMap<String, String>,
    pub wildcard_prefixes: Vec<String>,
}

fn canonical_specifier(file: &ParsedFile, specifier: &str, options: &ModulePathOptions) -> String {
    if !specifier.starts_with('.') {
        // Package specifier: retained verbatim.
        return specifier.to_string();
    }
    // Relative specifier: resolved against the file's own module path.
    let file_module = infer_module_path(std::path::Path::new(&file.file_path), options)
        .unwrap_or_default();
    let base_segments: Vec<&str> = file_module.split(options.separator).filter(|s| !s.is_empty()).collect();
    let mut segments: Vec<&str> = base_segments;
    // Drop the file's own last segment (module path includes the file
    // stem only when `include_file_name` is set; with it unset, segments
    // already point at the containing directory).
    for part in specifier.split('/') {
        match part {
            "." | "" => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join(&options.separator.to_string())
}

/// Build one file's import map (spec §4.5).
pub fn build(file: &ParsedFile, options: &ModulePathOptions) -> ImportMap {
    let mut map = ImportMap::default();

    for import in &file.imports {
        let resolved_specifier = canonical_specifier(file, &import.module_specifier, options);

        if import.is_wildcard {
            // Namespace/wildcard imports: the binder maps to the module's
            // FQN prefix; no per-member expansion.
            if let Some(binder) = &import.alias {
                map.simple_name_to_fqn
                    .insert(binder.clone(), resolved_specifier.clone());
            }
            map.wildcard_prefixes.push(resolved_specifier);
            continue;
        }

        if let Some(imported_name) = &import.imported_name {
            let local_name = import.alias.clone().unwrap_or_else(|| imported_name.clone());
            let fqn = if resolved_specifier.is_empty() {
                imported_name.clone()
            } else {
                format!("{resolved_specifier}.{imported_name}")
            };
            map.simple_name_to_fqn.insert(local_name, fqn);
        } else {
            // Default import: local name maps to the canonical default
            // export of the module — modeled as `<module>.default`.
            let local_name = import
                .alias
                .clone()
                .unwrap_or_else(|| resolved_specifier.rsplit('/').next().unwrap_or("default").to_string());
            map.simple_name_to_fqn
                .insert(local_name, format!("{resolved_specifier}.default"));
        }
    }

    map
}

pub fn wildcard_imports_for(imports: &[Import]) -> Vec<String> {
    imports
        .iter()
        .filter(|i| i.is_wildcard)
        .filter_map(|i| i.alias.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use symgraph_core::model::Language;

    fn opts() -> ModulePathOptions {
        ModulePathOptions {
            project_root: std::path::PathBuf::from("/repo"),
            ..Default::default()
        }
    }

    #[test]
    fn named_import_with_alias_maps_alias_to_fqn() {
        let mut file = ParsedFile::new("/repo/src/app/main.ts", Language::TypeScript);
        file.imports.push(Import {
            module_specifier: "../auth/session".to_string(),
            imported_name: Some("login".to_string()),
            alias: Some("doLogin".to_string()),
            is_wildcard: false,
            is_type_only: false,
            location: None,
        });
        let map = build(&file, &opts());
        assert_eq!(map.simple_name_to_fqn.get("doLogin"), Some(&"auth/session.login".to_string()));
    }

    #[test]
    fn package_specifier_is_retained_verbatim() {
        let mut file = ParsedFile::new("/repo/src/app/main.ts", Language::TypeScript);
        file.imports.push(Import {
            module_specifier: "lodash".to_string(),
            imported_name: Some("debounce".to_string()),
            alias: None,
            is_wildcard: false,
            is_type_only: false,
            location: None,
        });
        let map = build(&file, &opts());
        assert_eq!(map.simple_name_to_fqn.get("debounce"), Some(&"lodash.debounce".to_string()));
    }
}
