//! Access-flag bit sets from the classfile format.

use bitflags::bitflags;

bitflags! {
    /// Class-level access and property flags (the `access_flags` item of a classfile).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ClassAccessFlags: u16 {
        /// Declared public.
        const PUBLIC = 0x0001;
        /// Declared final.
        const FINAL = 0x0010;
        /// Treat superclass methods specially when invoked (historical).
        const SUPER = 0x0020;
        /// Is an interface, not a class.
        const INTERFACE = 0x0200;
        /// Declared abstract.
        const ABSTRACT = 0x0400;
        /// Not present in the source code.
        const SYNTHETIC = 0x1000;
        /// Declared as an annotation type.
        const ANNOTATION = 0x2000;
        /// Declared as an enum type.
        const ENUM = 0x4000;
        /// Is a module, not a class or interface.
        const MODULE = 0x8000;
    }
}

bitflags! {
    /// Field-level access and property flags (the `access_flags` item of a `field_info`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FieldAccessFlags: u16 {
        /// Declared public.
        const PUBLIC = 0x0001;
        /// Declared private.
        const PRIVATE = 0x0002;
        /// Declared protected.
        const PROTECTED = 0x0004;
        /// Declared static.
        const STATIC = 0x0008;
        /// Declared final.
        const FINAL = 0x0010;
        /// Declared volatile.
        const VOLATILE = 0x0040;
        /// Declared transient.
        const TRANSIENT = 0x0080;
        /// Not present in the source code.
        const SYNTHETIC = 0x1000;
        /// An element of an enum type.
        const ENUM = 0x4000;
    }
}

impl FieldAccessFlags {
    /// True when the field is both `static` and `final`, the precondition for carrying
    /// a compile-time `ConstantValue`.
    #[must_use]
    pub fn is_static_final(self) -> bool {
        self.contains(FieldAccessFlags::STATIC | FieldAccessFlags::FINAL)
    }
}
