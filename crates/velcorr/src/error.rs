// We define the public Error type here and keep the internal crate on its
// stringly `&'static str` errors. Defining everything in the internal crate
// and re-exporting it would also work, but wrapping is the more flexible
// approach and it's easy to migrate away from later.

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
}

/// The underlying internal error type
#[non_exhaustive]
#[derive(Clone, Debug)]
enum ErrorKind {
    /// An error that occurs when a velocity grid can't be built or used
    /// (zero dimension, inconsistent component buffers, an empty or
    /// non-castable sample table, bad rescale parameters)
    Grid(GridError),
    /// An error that occurs when the requested radius list is unusable
    RadiusList(RadiusListError),
    /// An error that occurs within `velcorr_nostd_internal`
    ///
    /// This wraps the stringly errors that are pervasive within the
    /// internal crate.
    Internal(InternalError),
}

// define constructor methods for Error
impl Error {
    /// produce an error indicating that a velocity grid can't be built or
    /// used
    pub(crate) fn grid(what: String) -> Self {
        Error {
            kind: ErrorKind::Grid(GridError { what }),
        }
    }

    /// produce an error indicating that the requested radius list is
    /// unusable
    pub(crate) fn radius_list(what: &'static str) -> Self {
        Error {
            kind: ErrorKind::RadiusList(RadiusListError { what }),
        }
    }

    /// wraps an internal error string
    pub(crate) fn internal(message: &'static str) -> Self {
        Error {
            kind: ErrorKind::Internal(InternalError(message)),
        }
    }
}

impl std::error::Error for Error {}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        self.kind.fmt(f)
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match *self {
            ErrorKind::Grid(ref err) => err.fmt(f),
            ErrorKind::RadiusList(ref err) => err.fmt(f),
            ErrorKind::Internal(ref err) => err.fmt(f),
        }
    }
}

/// An error that occurs when a velocity grid can't be built or used
#[derive(Clone, Debug)]
struct GridError {
    what: String,
}

impl core::fmt::Display for GridError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid grid: {}", self.what)
    }
}

/// An error that occurs when the requested radius list is unusable
#[derive(Clone, Debug)]
struct RadiusListError {
    what: &'static str,
}

impl core::fmt::Display for RadiusListError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid radius list: {}", self.what)
    }
}

/// Wraps the string errors from `velcorr_nostd_internal`
#[derive(Clone, Debug)]
struct InternalError(&'static str);

impl core::fmt::Display for InternalError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}
