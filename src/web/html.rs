//! HTML pages served by vidshelf.
//!
//! Pages are small and built with `format!`. Every piece of text that comes
//! from a file name goes through [`escape_html`]; hrefs are built from
//! percent-encoded paths.

use crate::upload::{explorer_url, Entry, Listing, UploadReceipt, EXPLORER_URL_PREFIX, UPLOAD_FIELD};

/// Escape text for use in HTML content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Wrap `body` in a complete document.
pub fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        body
    )
}

fn back_to_upload_link() -> &'static str {
    r#"<a href="/">Upload another video</a>"#
}

/// Download and view links for a stored file.
fn file_links(href: &str, name: &str) -> String {
    let href = escape_html(href);
    format!(
        r#"<a href="{href}" download>Download</a> | <a href="{href}" target="_blank">View</a> - {}"#,
        escape_html(name)
    )
}

/// Upload form page.
pub fn upload_form() -> String {
    let body = format!(
        r#"<h2>Upload a video</h2>
<form action="/upload" method="post" enctype="multipart/form-data">
  <input type="file" name="{UPLOAD_FIELD}" accept="video/*" required />
  <button type="submit">Upload video</button>
</form>
<br>
<a href="{EXPLORER_URL_PREFIX}/">Browse uploaded files and folders</a>"#
    );
    page("Upload a video", &body)
}

/// Confirmation page shown after a successful upload.
pub fn upload_confirmation(receipt: &UploadReceipt) -> String {
    let href = escape_html(&receipt.record.storage_path);
    let body = format!(
        r#"<h2>Video uploaded successfully!</h2>
<p>{}</p>
<ul>
  <li><a href="{href}" download>Download file</a></li>
  <li><a href="{href}" target="_blank">View in browser</a></li>
</ul>
{}"#,
        escape_html(&receipt.record.original_name),
        back_to_upload_link()
    );
    page("Upload complete", &body)
}

/// Flat list of the files in the upload root.
pub fn video_list(files: &[Entry]) -> String {
    let items: String = files
        .iter()
        .map(|f| format!("<li>{}</li>\n", file_links(&f.href(), &f.name)))
        .collect();

    let body = format!(
        "<h2>Uploaded videos</h2>\n<ul>\n{items}</ul>\n{}",
        back_to_upload_link()
    );
    page("Uploaded videos", &body)
}

/// One explorer level with a link to the parent when not at the root.
pub fn explorer_listing(listing: &Listing) -> String {
    let mut items = String::new();

    if let Some(parent) = &listing.parent {
        items.push_str(&format!(
            "<li><a href=\"{}\">.. (up)</a></li>\n",
            escape_html(&explorer_url(parent))
        ));
    }

    for entry in &listing.entries {
        if entry.is_dir() {
            items.push_str(&format!(
                "<li><a href=\"{}\">{}/</a></li>\n",
                escape_html(&entry.href()),
                escape_html(&entry.name)
            ));
        } else {
            items.push_str(&format!(
                "<li>{} <small>({}, {})</small></li>\n",
                file_links(&entry.href(), &entry.name),
                format_size(entry.size),
                escape_html(&entry.content_type)
            ));
        }
    }

    let heading = if listing.path.is_root() {
        "File explorer".to_string()
    } else {
        format!("File explorer: /{}", escape_html(&listing.path.to_string()))
    };

    let summary = format!(
        "{} {}, {} {}",
        listing.directory_count(),
        plural(listing.directory_count(), "folder", "folders"),
        listing.file_count(),
        plural(listing.file_count(), "file", "files")
    );

    let body = format!(
        "<h2>{heading}</h2>\n<p>{summary}</p>\n<ul>\n{items}</ul>\n{}",
        back_to_upload_link()
    );
    page("File explorer", &body)
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 {
        one
    } else {
        many
    }
}

/// Human-readable file size.
fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut size = bytes as f64 / 1024.0;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{size:.1} {}", UNITS[unit])
}

/// Error page.
pub fn error_page(message: &str) -> String {
    let body = format!("<h2>{}</h2>\n{}", escape_html(message), back_to_upload_link());
    page("Error", &body)
}
