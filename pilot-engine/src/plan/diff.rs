//! Annotated job diff rendering
//!
//! Markers are aligned on their uncoloured width so that names line up
//! whether or not colours are enabled.

use colored::Color;
use pilot_core::domain::plan::{DiffType, FieldDiff, JobDiff, ObjectDiff, TaskDiff, TaskGroupDiff};

use super::palette::Palette;

/// Renders a job diff tree. Added and deleted nodes stay collapsed unless
/// verbose.
pub(crate) struct DiffRenderer {
    palette: Palette,
    verbose: bool,
}

impl DiffRenderer {
    pub fn new(palette: Palette, verbose: bool) -> Self {
        Self { palette, verbose }
    }

    pub fn job(&self, diff: &JobDiff) -> String {
        let marker = self.marker(diff.diff_type);
        let mut out = format!(
            "{}{}\n",
            marker,
            self.palette.bold(&format!("Job: {:?}", diff.id))
        );

        let (longest_field, mut longest_marker) = longest_prefixes(&diff.fields, &diff.objects);
        for group in &diff.task_groups {
            longest_marker = longest_marker.max(marker_width(group.diff_type));
        }

        if diff.diff_type == DiffType::Edited || self.verbose {
            let section =
                self.fields_and_objects(&diff.fields, &diff.objects, 0, longest_field, longest_marker);
            if !section.is_empty() {
                out.push_str(&section);
                out.push('\n');
            }
        }

        for group in &diff.task_groups {
            let key_prefix = longest_marker - marker_width(group.diff_type);
            out.push_str(&self.task_group(group, key_prefix));
            out.push('\n');
        }

        out
    }

    fn task_group(&self, group: &TaskGroupDiff, group_prefix: usize) -> String {
        let mut out = format!(
            "{}{}{}",
            self.marker(group.diff_type),
            spaces(group_prefix),
            self.palette.bold(&format!("Task Group: {:?}", group.name))
        );

        if group.updates.is_empty() {
            out.push('\n');
        } else {
            let updates: Vec<String> = group
                .updates
                .iter()
                .map(|(update_type, count)| {
                    let text = format!("{count} {update_type}");
                    match update_color(update_type) {
                        Some(color) => self.palette.paint(&text, color),
                        None => text,
                    }
                })
                .collect();
            out.push_str(&format!(" ({})\n", updates.join(", ")));
        }

        let (longest_field, mut longest_marker) = longest_prefixes(&group.fields, &group.objects);
        for task in &group.tasks {
            longest_marker = longest_marker.max(marker_width(task.diff_type));
        }

        let sub_prefix = group_prefix + 2;
        if group.diff_type == DiffType::Edited || self.verbose {
            let section = self.fields_and_objects(
                &group.fields,
                &group.objects,
                sub_prefix,
                longest_field,
                longest_marker,
            );
            if !section.is_empty() {
                out.push_str(&section);
                out.push('\n');
            }
        }

        for task in &group.tasks {
            let task_prefix = longest_marker - marker_width(task.diff_type);
            out.push_str(&self.task(task, sub_prefix, task_prefix));
            out.push('\n');
        }

        out
    }

    fn task(&self, task: &TaskDiff, start_prefix: usize, task_prefix: usize) -> String {
        let mut out = format!(
            "{}{}{}{}",
            spaces(start_prefix),
            self.marker(task.diff_type),
            spaces(task_prefix),
            self.palette.bold(&format!("Task: {:?}", task.name))
        );
        if !task.annotations.is_empty() {
            out.push_str(&format!(" ({})", self.annotations(&task.annotations)));
        }

        match task.diff_type {
            DiffType::None => return out,
            DiffType::Added | DiffType::Deleted if !self.verbose => return out,
            _ => out.push('\n'),
        }

        let (longest_field, longest_marker) = longest_prefixes(&task.fields, &task.objects);
        out.push_str(&self.fields_and_objects(
            &task.fields,
            &task.objects,
            start_prefix + 2,
            longest_field,
            longest_marker,
        ));
        out
    }

    fn object(&self, diff: &ObjectDiff, start_prefix: usize, key_prefix: usize) -> String {
        let mut out = format!(
            "{}{}{}{} {{\n",
            spaces(start_prefix),
            self.marker(diff.diff_type),
            spaces(key_prefix),
            diff.name
        );

        let (longest_field, longest_marker) = longest_prefixes(&diff.fields, &diff.objects);
        out.push_str(&self.fields_and_objects(
            &diff.fields,
            &diff.objects,
            start_prefix + key_prefix + 2,
            longest_field,
            longest_marker,
        ));

        let end_prefix = start_prefix + marker_width(diff.diff_type) + key_prefix;
        format!("{}\n{}}}", out, spaces(end_prefix))
    }

    fn field(
        &self,
        diff: &FieldDiff,
        start_prefix: usize,
        key_prefix: usize,
        value_prefix: usize,
    ) -> String {
        let mut out = format!(
            "{}{}{}{}: {}",
            spaces(start_prefix),
            self.marker(diff.diff_type),
            spaces(key_prefix),
            diff.name,
            spaces(value_prefix)
        );

        match diff.diff_type {
            DiffType::Added | DiffType::None => out.push_str(&format!("{:?}", diff.new)),
            DiffType::Deleted => out.push_str(&format!("{:?}", diff.old)),
            DiffType::Edited => out.push_str(&format!("{:?} => {:?}", diff.old, diff.new)),
        }

        if !diff.annotations.is_empty() {
            out.push_str(&format!(" ({})", self.annotations(&diff.annotations)));
        }

        out
    }

    /// Fields then objects, one per line, without a trailing newline
    fn fields_and_objects(
        &self,
        fields: &[FieldDiff],
        objects: &[ObjectDiff],
        start_prefix: usize,
        longest_field: usize,
        longest_marker: usize,
    ) -> String {
        let mut lines = Vec::with_capacity(fields.len() + objects.len());

        for field in fields {
            let key_prefix = longest_marker - marker_width(field.diff_type);
            let value_prefix = longest_field.saturating_sub(field.name.len());
            lines.push(self.field(field, start_prefix, key_prefix, value_prefix));
        }
        for object in objects {
            let key_prefix = longest_marker - marker_width(object.diff_type);
            lines.push(self.object(object, start_prefix, key_prefix));
        }

        lines.join("\n")
    }

    fn marker(&self, diff_type: DiffType) -> String {
        match diff_type {
            DiffType::Added => format!("{} ", self.palette.paint("+", Color::Green)),
            DiffType::Deleted => format!("{} ", self.palette.paint("-", Color::Red)),
            DiffType::Edited => format!("{} ", self.palette.paint("+/-", Color::BrightYellow)),
            DiffType::None => String::new(),
        }
    }

    fn annotations(&self, annotations: &[String]) -> String {
        annotations
            .iter()
            .map(|annotation| match annotation_color(annotation) {
                Some(color) => self.palette.paint(annotation, color),
                None => annotation.clone(),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Width of a diff marker, trailing space included, without colour codes
pub(crate) fn marker_width(diff_type: DiffType) -> usize {
    match diff_type {
        DiffType::Added | DiffType::Deleted => 2,
        DiffType::Edited => 4,
        DiffType::None => 0,
    }
}

/// Longest field name and widest marker among siblings
fn longest_prefixes(fields: &[FieldDiff], objects: &[ObjectDiff]) -> (usize, usize) {
    let longest_field = fields.iter().map(|f| f.name.len()).max().unwrap_or(0);
    let longest_marker = fields
        .iter()
        .map(|f| marker_width(f.diff_type))
        .chain(objects.iter().map(|o| marker_width(o.diff_type)))
        .max()
        .unwrap_or(0);
    (longest_field, longest_marker)
}

fn update_color(update_type: &str) -> Option<Color> {
    match update_type {
        "create" => Some(Color::Green),
        "destroy" => Some(Color::Red),
        "migrate" => Some(Color::Blue),
        "in-place update" => Some(Color::Cyan),
        "create/destroy update" => Some(Color::Yellow),
        "canary" => Some(Color::BrightYellow),
        _ => None,
    }
}

fn annotation_color(annotation: &str) -> Option<Color> {
    match annotation {
        "forces create" => Some(Color::Green),
        "forces destroy" => Some(Color::Red),
        "forces in-place update" => Some(Color::Cyan),
        "forces create/destroy update" => Some(Color::Yellow),
        _ => None,
    }
}

fn spaces(count: usize) -> String {
    " ".repeat(count)
}
