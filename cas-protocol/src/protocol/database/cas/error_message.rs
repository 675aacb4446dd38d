/// Ordered `(message, code)` table used to name server error codes that arrive
/// without a message of their own.
#[derive(Debug, Clone, Copy)]
pub struct ErrorMessages<'a> {
    entries: &'a [(&'a str, i32)],
}

impl<'a> ErrorMessages<'a> {
    pub const fn new(entries: &'a [(&'a str, i32)]) -> Self {
        ErrorMessages { entries }
    }

    /// First entry whose code matches exactly.
    pub fn lookup(&self, code: i32) -> Option<&'a str> {
        self.entries
            .iter()
            .find(|(_, c)| *c == code)
            .map(|(message, _)| *message)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Error codes raised by the CAS itself.
pub const CAS_ERROR_MESSAGES: ErrorMessages<'static> = ErrorMessages::new(&[
    ("DBMS error", -1000),
    ("Internal error", -1001),
    ("Memory allocation error", -1002),
    ("Communication error", -1003),
    ("Invalid argument", -1004),
    ("Unknown transaction type", -1005),
    ("Invalid server handle", -1006),
    ("Invalid number of bind variables", -1007),
    ("Unknown data type", -1008),
    ("Cannot make a database value", -1009),
    ("Type conversion error", -1010),
    ("Invalid parameter name", -1011),
    ("No more data", -1012),
    ("Invalid object", -1013),
    ("Cannot open file", -1014),
    ("Invalid schema type", -1015),
    ("Version mismatch", -1016),
    ("Cannot process the request. Try again later", -1017),
    ("Client is not authorized to connect", -1018),
    ("Query was cancelled", -1019),
    ("Not a collection", -1020),
    ("Heterogeneous collection domain", -1021),
    ("No more result set", -1022),
    ("Invalid call statement", -1023),
    ("Statement pooling error", -1024),
    ("Database server is disconnected", -1025),
    ("Cannot prepare more than the maximum number of prepared statements", -1026),
    ("Holdable result set is not allowed", -1027),
    ("Attempt to use a function that is not supported", -1100),
    ("Authentication failure", -1200),
]);
