const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// Human readable size for the selected-files list.
pub fn format_size(size: u64) -> String {
    let mut size = size as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", size as u64, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

/// Combined size of a batch of files, e.g. "3 files, 1.2 MB".
pub fn describe_batch(sizes: impl IntoIterator<Item = u64>) -> String {
    let (count, total) = sizes
        .into_iter()
        .fold((0usize, 0u64), |(count, total), size| (count + 1, total + size));
    let noun = if count == 1 { "file" } else { "files" };
    format!("{count} {noun}, {}", format_size(total))
}
