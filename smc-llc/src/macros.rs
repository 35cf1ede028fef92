macro_rules! enum_sim {
    (
        $(#[$enum_attr: meta])*
        pub struct $tname:ident ($size_t:ty) {
            $(
                $(#[$arm_attr: meta])*
                $enum_arm:ident = $num_exp:expr
            ),+ $(,)?
        }
    ) => {
        #[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
        $(#[$enum_attr])*
        pub struct $tname($size_t);

        impl $tname {
            $(
                $(#[$arm_attr])*
                pub const $enum_arm: Self = Self($num_exp);
            )+

            /// Get the raw value.
            #[inline]
            pub fn raw(&self) -> $size_t {
                self.0
            }
        }

        impl ::core::convert::From<$size_t> for $tname {
            #[inline]
            fn from(value: $size_t) -> $tname {
                $tname(value)
            }
        }

        impl ::core::convert::From<$tname> for $size_t {
            #[inline]
            fn from(value: $tname) -> $size_t {
                value.0
            }
        }
    };
}

// Renders a code point as `"{raw} ({name})"`, the layout every enumerated
// field of the LLC messages shares.
macro_rules! code_display {
    ($tname:ident) => {
        impl ::core::fmt::Display for $tname {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{} ({})", self.0, self.name())
            }
        }
    };
}

// Implements `Render` and `Display` for an LLC message type that holds its
// `RawMessage` in a `base` field and provides `write_fields`.
macro_rules! impl_message_render {
    ($tname:ident) => {
        impl $crate::render::Render for $tname {
            fn write_to(
                &self,
                out: &mut dyn ::core::fmt::Write,
                verbose: bool,
            ) -> ::core::fmt::Result {
                self.write_fields(out, verbose)
            }

            fn raw(&self) -> &[u8] {
                self.base.raw()
            }

            fn layer_type(&self) -> $crate::llc::MessageType {
                self.base.msg_type()
            }
        }

        impl ::core::fmt::Display for $tname {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                self.write_fields(f, false)
            }
        }
    };
}
