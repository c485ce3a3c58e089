/// Converts a `Result` into an `Option`, logging the discarded error.
///
/// Detection signals are individually unreliable, so most failures are not
/// propagated. They are logged at a level that reflects how surprising they are
/// and then treated as "no signal".
pub trait ResultOkLogExt<T, E> {
    /// Discards the error after logging it at the given level.
    fn ok_log_at(self, level: log::Level) -> Option<T>;
}

impl<T, E> ResultOkLogExt<T, E> for std::result::Result<T, E>
where
    E: std::error::Error,
{
    fn ok_log_at(self, level: log::Level) -> Option<T> {
        match self {
            Ok(ok) => Some(ok),
            Err(err) => {
                log::log!(level, "{err}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_log_at_passes_through_ok() {
        let res: Result<u8, std::io::Error> = Ok(7);
        assert_eq!(res.ok_log_at(log::Level::Warn), Some(7));
    }

    #[test]
    fn test_ok_log_at_discards_err() {
        let res: Result<u8, std::io::Error> = Err(std::io::Error::other("boom"));
        assert_eq!(res.ok_log_at(log::Level::Debug), None);
    }
}
