use super::{ApiError, Page};

enum Cursor {
    Start,
    Next(String),
    Done,
}

/// Lazily walks a paginated listing, one request per `next()`.
///
/// Stops after the page that carries no continuation token. An error is
/// yielded once and ends the sequence.
pub struct Pages<F> {
    fetch: F,
    cursor: Cursor,
}

pub fn pages<T, F>(fetch: F) -> Pages<F>
where
    F: FnMut(Option<&str>) -> Result<Page<T>, ApiError>,
{
    Pages {
        fetch,
        cursor: Cursor::Start,
    }
}

impl<T, F> Iterator for Pages<F>
where
    F: FnMut(Option<&str>) -> Result<Page<T>, ApiError>,
{
    type Item = Result<Vec<T>, ApiError>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = match std::mem::replace(&mut self.cursor, Cursor::Done) {
            Cursor::Done => return None,
            Cursor::Start => None,
            Cursor::Next(token) => Some(token),
        };
        match (self.fetch)(token.as_deref()) {
            Ok(page) => {
                if let Some(next) = page.next_page_token
                    && !next.is_empty()
                {
                    self.cursor = Cursor::Next(next);
                }
                Some(Ok(page.items))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
