// src/api/multipart.rs
use uuid::Uuid;

/// `multipart/form-data` body builder for the upload endpoint.
#[derive(Debug)]
pub struct MultipartForm {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::with_boundary(format!("----comment-insight-{}", Uuid::new_v4().simple()))
    }

    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            body: Vec::new(),
        }
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn file(mut self, field: &str, filename: &str, content_type: &str, data: &[u8]) -> Self {
        let header = format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
            self.boundary,
            escape_quoted(field),
            escape_quoted(filename),
            content_type,
        );
        self.body.extend_from_slice(header.as_bytes());
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.body.extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        self.body
    }
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_quoted(value: &str) -> String {
    value
        .chars()
        .filter(|c| *c != '\r' && *c != '\n')
        .map(|c| if c == '"' { "%22".to_string() } else { c.to_string() })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_file_part_layout() {
        let form = MultipartForm::with_boundary("XYZ").file("file", "week1.csv", "text/csv", b"comment\nok\n");
        assert_eq!(form.content_type(), "multipart/form-data; boundary=XYZ");

        let body = String::from_utf8(form.finish()).unwrap();
        assert_eq!(
            body,
            "--XYZ\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"week1.csv\"\r\n\
             Content-Type: text/csv\r\n\r\n\
             comment\nok\n\r\n\
             --XYZ--\r\n"
        );
    }

    #[test]
    fn quotes_and_newlines_in_filenames_are_neutralised() {
        let body = MultipartForm::with_boundary("B")
            .file("file", "a\"b\r\n.csv", "text/csv", b"")
            .finish();
        let body = String::from_utf8(body).unwrap();
        assert!(body.contains("filename=\"a%22b.csv\""));
    }

    #[test]
    fn random_boundaries_differ() {
        assert_ne!(MultipartForm::new().content_type(), MultipartForm::new().content_type());
    }
}
