//! Status enums stored as their variant names in string columns.
//!
//! Every lifecycle enum lists its legal successors; callers check
//! [`Lifecycle::can_transition_to`] before writing a new status.

use crate::errors::ModelError;

macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident, $label:literal { $($variant:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ::serde::Serialize, ::serde::Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::errors::ModelError;

            /// Case-insensitive match on the variant name.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| $crate::errors::ModelError::Validation(format!("unknown {} '{}'", $label, s)))
            }
        }
    };
}

pub(crate) use string_enum;

/// A status with a fixed transition graph.
pub trait Lifecycle: Copy + PartialEq + std::fmt::Display + 'static {
    fn successors(self) -> &'static [Self];

    fn can_transition_to(self, next: Self) -> bool {
        self.successors().contains(&next)
    }

    fn is_terminal(self) -> bool {
        self.successors().is_empty()
    }

    /// Reject moves that are not edges of the graph.
    fn ensure_transition(self, next: Self) -> Result<(), ModelError> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(ModelError::Validation(format!("cannot move from {self} to {next}")))
        }
    }
}

string_enum!(
    /// Lifecycle of a photographer booking.
    BookingStatus, "booking status" {
        Pending,
        Confirmed,
        InProgress,
        Completed,
        Cancelled,
        Rejected,
    }
);

impl Lifecycle for BookingStatus {
    fn successors(self) -> &'static [Self] {
        use BookingStatus::*;
        match self {
            Pending => &[Confirmed, Rejected, Cancelled],
            Confirmed => &[InProgress, Cancelled],
            InProgress => &[Completed],
            Completed | Cancelled | Rejected => &[],
        }
    }
}

impl BookingStatus {
    /// Statuses that occupy the photographer's calendar.
    pub fn blocks_calendar(self) -> bool {
        matches!(self, BookingStatus::Confirmed | BookingStatus::InProgress)
    }

    pub fn is_payable(self) -> bool {
        matches!(self, BookingStatus::Confirmed | BookingStatus::InProgress | BookingStatus::Completed)
    }

    /// Photos can be attached once the shoot has started.
    pub fn accepts_photos(self) -> bool {
        matches!(self, BookingStatus::InProgress | BookingStatus::Completed)
    }
}

string_enum!(
    /// Lifecycle of a retouching order.
    RetouchOrderStatus, "retouch order status" {
        Pending,
        Accepted,
        InProgress,
        Completed,
        Cancelled,
        Rejected,
    }
);

impl Lifecycle for RetouchOrderStatus {
    fn successors(self) -> &'static [Self] {
        use RetouchOrderStatus::*;
        match self {
            Pending => &[Accepted, Rejected, Cancelled],
            Accepted => &[InProgress, Cancelled],
            InProgress => &[Completed],
            Completed | Cancelled | Rejected => &[],
        }
    }
}

impl RetouchOrderStatus {
    pub fn is_payable(self) -> bool {
        matches!(self, RetouchOrderStatus::Accepted | RetouchOrderStatus::InProgress | RetouchOrderStatus::Completed)
    }
}

string_enum!(
    PaymentStatus, "payment status" {
        Pending,
        Completed,
        Refunded,
    }
);

impl Lifecycle for PaymentStatus {
    fn successors(self) -> &'static [Self] {
        use PaymentStatus::*;
        match self {
            Pending => &[Completed, Refunded],
            Completed => &[Refunded],
            Refunded => &[],
        }
    }
}

string_enum!(
    PaymentMethod, "payment method" {
        Card,
        Transfer,
        Cash,
    }
);

impl PaymentMethod {
    /// Cash is settled in person and stays pending until the payee confirms it.
    pub fn settles_immediately(self) -> bool {
        !matches!(self, PaymentMethod::Cash)
    }
}

string_enum!(
    ApplicationStatus, "application status" {
        Pending,
        Approved,
        Rejected,
    }
);

impl Lifecycle for ApplicationStatus {
    fn successors(self) -> &'static [Self] {
        use ApplicationStatus::*;
        match self {
            Pending => &[Approved, Rejected],
            Approved | Rejected => &[],
        }
    }
}
