pub type Result<T> = std::result::Result<T, crate::error::Error>;

/// Returns `InvalidArgument` from the enclosing function unless `$expr` holds.
#[macro_export]
macro_rules! verify_arg {
    ($name:expr, $expr:expr) => {{
        let holds = $expr;
        $crate::result::check_arg(holds, stringify!($name), stringify!($expr))?;
    }};
}

/// Returns `OutOfRange` from the enclosing function unless `$expr` holds.
///
/// `$operation` names what was being attempted and ends up in the error message.
#[macro_export]
macro_rules! verify_range {
    ($operation:expr, $expr:expr) => {{
        let holds = $expr;
        $crate::result::check_range(holds, $operation, stringify!($expr))?;
    }};
}

#[inline]
pub fn check_arg(holds: bool, name: &str, condition: &str) -> Result<()> {
    if !holds {
        return Err(crate::error::Error::invalid_arg(
            name,
            format!("expected {condition}"),
        ));
    }
    Ok(())
}

#[inline]
pub fn check_range(holds: bool, operation: &str, condition: &str) -> Result<()> {
    if !holds {
        return Err(crate::error::Error::out_of_range(
            operation,
            format!("{condition} does not hold"),
        ));
    }
    Ok(())
}
