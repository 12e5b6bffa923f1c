//! `Inspect` and `Describe` for standard library types.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

use indexmap::IndexMap;

use super::{Describe, Inspect, Kind, Shape};

// ============================================================================
// PRIMITIVES
// ============================================================================

macro_rules! impl_primitive {
    ($($ty:ty => $zero:expr),* $(,)?) => {
        $(
            impl Inspect for $ty {
                fn kind(&self) -> Kind {
                    Kind::Primitive
                }

                fn is_zero(&self) -> bool {
                    *self == $zero
                }

                fn shape(&self) -> Shape {
                    <Self as Describe>::shape()
                }
            }

            impl Describe for $ty {
                fn shape() -> Shape {
                    Shape::leaf::<Self>(Kind::Primitive)
                }
            }
        )*
    };
}

impl_primitive! {
    bool => false,
    char => '\0',
    i8 => 0, i16 => 0, i32 => 0, i64 => 0, i128 => 0, isize => 0,
    u8 => 0, u16 => 0, u32 => 0, u64 => 0, u128 => 0, usize => 0,
    f32 => 0.0, f64 => 0.0,
}

impl Inspect for () {
    fn kind(&self) -> Kind {
        Kind::Primitive
    }

    fn is_zero(&self) -> bool {
        true
    }

    fn shape(&self) -> Shape {
        <Self as Describe>::shape()
    }
}

impl Describe for () {
    fn shape() -> Shape {
        Shape::leaf::<Self>(Kind::Primitive)
    }
}

// ============================================================================
// TEXT
// ============================================================================

macro_rules! impl_text {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Inspect for $ty {
                fn kind(&self) -> Kind {
                    Kind::Text
                }

                fn is_zero(&self) -> bool {
                    self.is_empty()
                }

                fn len(&self) -> Option<usize> {
                    Some(self.chars().count())
                }

                fn as_text(&self) -> Option<&str> {
                    Some(&**self)
                }

                fn shape(&self) -> Shape {
                    <Self as Describe>::shape()
                }
            }

            impl Describe for $ty {
                fn shape() -> Shape {
                    Shape::leaf::<Self>(Kind::Text)
                }
            }
        )*
    };
}

impl_text!(String, &str, Box<str>, Arc<str>, Rc<str>, Cow<'_, str>);

// ============================================================================
// COLLECTIONS
// ============================================================================

macro_rules! impl_collection {
    ($kind:expr => $($ty:ty [$($generics:tt)*]),* $(,)?) => {
        $(
            impl<$($generics)*> Inspect for $ty {
                fn kind(&self) -> Kind {
                    $kind
                }

                fn is_zero(&self) -> bool {
                    self.is_empty()
                }

                fn len(&self) -> Option<usize> {
                    Some(<$ty>::len(self))
                }

                fn shape(&self) -> Shape {
                    <Self as Describe>::shape()
                }
            }

            impl<$($generics)*> Describe for $ty {
                fn shape() -> Shape {
                    Shape::leaf::<Self>($kind)
                }
            }
        )*
    };
}

impl_collection! { Kind::Sequence =>
    Vec<T> [T],
    VecDeque<T> [T],
}

impl_collection! { Kind::Mapping =>
    HashMap<K, V, S> [K, V, S],
    BTreeMap<K, V> [K, V],
    IndexMap<K, V, S> [K, V, S],
    HashSet<T, S> [T, S],
    BTreeSet<T> [T],
}

impl<T> Inspect for &[T] {
    fn kind(&self) -> Kind {
        Kind::Sequence
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn len(&self) -> Option<usize> {
        Some(<[T]>::len(self))
    }

    fn shape(&self) -> Shape {
        <Self as Describe>::shape()
    }
}

impl<T> Describe for &[T] {
    fn shape() -> Shape {
        Shape::leaf::<Self>(Kind::Sequence)
    }
}

impl<T, const N: usize> Inspect for [T; N] {
    fn kind(&self) -> Kind {
        Kind::Sequence
    }

    fn is_zero(&self) -> bool {
        N == 0
    }

    fn len(&self) -> Option<usize> {
        Some(N)
    }

    fn shape(&self) -> Shape {
        <Self as Describe>::shape()
    }
}

impl<T, const N: usize> Describe for [T; N] {
    fn shape() -> Shape {
        Shape::leaf::<Self>(Kind::Sequence)
    }
}

// ============================================================================
// OPTIONAL
// ============================================================================

impl<T: Inspect + Describe> Inspect for Option<T> {
    fn kind(&self) -> Kind {
        Kind::Optional
    }

    fn is_absent(&self) -> bool {
        self.is_none()
    }

    fn is_zero(&self) -> bool {
        self.is_none()
    }

    fn pointee(&self) -> Option<&dyn Inspect> {
        self.as_ref().map(|value| value as &dyn Inspect)
    }

    fn shape(&self) -> Shape {
        <Self as Describe>::shape()
    }
}

impl<T: Describe> Describe for Option<T> {
    fn shape() -> Shape {
        Shape::pointer::<Self>(Kind::Optional, <T as Describe>::shape)
    }
}

// ============================================================================
// REFERENCES
// ============================================================================

macro_rules! impl_reference {
    ($($ty:ty [$($lt:lifetime)?]),* $(,)?) => {
        $(
            impl<$($lt,)? T: Inspect + Describe> Inspect for $ty {
                fn kind(&self) -> Kind {
                    Kind::Reference
                }

                fn is_zero(&self) -> bool {
                    (**self).is_zero()
                }

                fn pointee(&self) -> Option<&dyn Inspect> {
                    Some(&**self)
                }

                fn shape(&self) -> Shape {
                    <Self as Describe>::shape()
                }
            }

            impl<$($lt,)? T: Describe> Describe for $ty {
                fn shape() -> Shape {
                    Shape::pointer::<Self>(Kind::Reference, <T as Describe>::shape)
                }
            }
        )*
    };
}

impl_reference!(Box<T> [], Arc<T> [], Rc<T> [], &'a T ['a]);

// ============================================================================
// ANY
// ============================================================================

impl Inspect for Box<dyn Inspect> {
    fn kind(&self) -> Kind {
        Kind::Any
    }

    fn is_zero(&self) -> bool {
        (**self).is_zero()
    }

    fn pointee(&self) -> Option<&dyn Inspect> {
        Some(&**self)
    }

    fn shape(&self) -> Shape {
        <Self as Describe>::shape()
    }
}

impl Describe for Box<dyn Inspect> {
    fn shape() -> Shape {
        Shape::leaf::<Self>(Kind::Any)
    }
}
