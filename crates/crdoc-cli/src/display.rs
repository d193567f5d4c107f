//! Display formatting for CLI output
//!
//! Provides structured display for:
//! - Resource views with their spec and status field trees
//! - Release listings

use console::style;

use crdoc_core::field::{field_views, scope};
use crdoc_core::{FieldView, Release, ReleaseRegistry, Schema};
use crdoc_repo::ResolvedView;

/// Print a resolved resource view
pub fn print_view(view: &ResolvedView) {
    println!("{}", style(&view.name).cyan().bold());
    println!("{}", style("=".repeat(view.name.len())).dim());
    println!();

    println!("{}: {}", style("Kind").bold(), view.kind);
    println!("{}: {}", style("Group").bold(), view.group);
    println!("{}: {}", style("Version").bold(), view.version_on_focus);
    println!(
        "{}: {} ({})",
        style("Release").bold(),
        view.release_label,
        style(&view.release_name).dim()
    );

    if let Some(app_version) = &view.app_version {
        println!("{}: {}", style("App Version").bold(), app_version);
    }

    let versions: Vec<String> = view
        .valid_versions
        .iter()
        .map(|v| {
            if *v == view.version_on_focus {
                style(v).green().bold().to_string()
            } else {
                v.clone()
            }
        })
        .collect();
    println!("{}: {}", style("Versions").bold(), versions.join(", "));

    if view.deprecated {
        let since = view
            .deprecated_since
            .as_deref()
            .map(|label| format!(" since {}", label))
            .unwrap_or_default();
        println!();
        println!(
            "{} {}",
            style("⚠").yellow(),
            style(format!("This version is deprecated{}", since)).yellow()
        );
    } else if let Some(label) = &view.deprecated_since {
        println!();
        println!("{} Deprecated since {}", style("⚠").yellow(), label);
    }

    print_section("Spec", view.spec.as_ref());
    print_section("Status", view.status.as_ref());
}

fn print_section(title: &str, schema: Option<&Schema>) {
    println!();
    println!("{}:", style(title).bold());

    match schema {
        Some(schema) if !field_views(schema).is_empty() => print_fields(schema, 1),
        Some(schema) => {
            let description = crdoc_core::field::description(schema);
            if description.is_empty() {
                println!("  {}", style("(no fields)").dim());
            } else {
                println!("  {}", description);
            }
        }
        None => println!("  {}", style("(not defined)").dim()),
    }
}

fn print_fields(schema: &Schema, depth: usize) {
    let Some(properties) = scope(schema).properties() else {
        return;
    };

    for (view, child) in field_views(schema).iter().zip(properties.values()) {
        print_field(view, depth);
        if view.has_children {
            print_fields(child, depth + 1);
        }
    }
}

fn print_field(field: &FieldView, depth: usize) {
    let indent = "  ".repeat(depth);
    let marker = if field.required {
        style("*").red().to_string()
    } else {
        String::new()
    };

    println!(
        "{}{}{} {}",
        indent,
        style(&field.name).cyan(),
        marker,
        style(&field.type_name).dim()
    );

    let detail_indent = "  ".repeat(depth + 1);
    if !field.description.is_empty() {
        println!("{}{}", detail_indent, field.description);
    }

    let mut constraints = Vec::new();
    if !field.default.is_empty() {
        constraints.push(format!("default: {}", field.default));
    }
    if !field.enum_values.is_empty() {
        constraints.push(format!("enum: {}", field.enum_values));
    }
    if !field.format.is_empty() {
        constraints.push(format!("format: {}", field.format));
    }
    if let Some(minimum) = field.minimum {
        constraints.push(format!("min: {}", minimum));
    }
    if let Some(maximum) = field.maximum {
        constraints.push(format!("max: {}", maximum));
    }
    if !constraints.is_empty() {
        println!("{}{}", detail_indent, style(constraints.join(", ")).blue());
    }
}

/// Print the release table
pub fn print_releases(releases: &ReleaseRegistry) {
    println!("{:<16} {:<16} {:<30} DEFAULT", "NAME", "LABEL", "FOLDER");
    println!("{}", "-".repeat(72));

    let default = releases.selected(None);
    for release in releases.iter() {
        print_release(release, release.name == default.name);
    }
}

fn print_release(release: &Release, is_default: bool) {
    println!(
        "{:<16} {:<16} {:<30} {}",
        release.name,
        release.display_label(),
        release.folder,
        if is_default { "*" } else { "" }
    );
}
