#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpStatus {
    Ok = 200,
    NotFound = 404,
}

impl HttpStatus {
    pub fn code(self) -> u16 {
        self as u16
    }

    pub fn reason_phrase(self) -> &'static str {
        match self {
            HttpStatus::Ok => "OK",               // 200
            HttpStatus::NotFound => "Not Found",  // 404
        }
    }
}
