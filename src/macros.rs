#[cfg(feature = "tracing")]
macro_rules! sctrace {
    ($($tt:tt)*) => {
        tracing::trace!(target: "scrollfetch", $($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! sctrace {
    ($($tt:tt)*) => {{}};
}

#[cfg(feature = "tracing")]
macro_rules! scdebug {
    ($($tt:tt)*) => {
        tracing::debug!(target: "scrollfetch", $($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! scdebug {
    ($($tt:tt)*) => {{}};
}

#[cfg(feature = "tracing")]
macro_rules! scwarn {
    ($($tt:tt)*) => {
        tracing::warn!(target: "scrollfetch", $($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! scwarn {
    ($($tt:tt)*) => {{}};
}
