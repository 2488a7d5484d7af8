//! Consumer of the generated stdlib wrappers.
//!
//! The `sys` module stands in for the native libfive bindings: every entry
//! point records its symbol and marshaled arguments and hands back a fresh
//! handle, so the generated code can be exercised without linking libfive.

/// A shape or expression handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tree(pub sys::libfive_tree);

/// A scalar expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeFloat(pub sys::libfive_tree);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeVec2 {
    pub x: TreeFloat,
    pub y: TreeFloat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeVec3 {
    pub x: TreeFloat,
    pub y: TreeFloat,
    pub z: TreeFloat,
}

impl TreeVec2 {
    pub fn new(x: TreeFloat, y: TreeFloat) -> Self {
        Self { x, y }
    }
}

impl TreeVec3 {
    pub fn new(x: TreeFloat, y: TreeFloat, z: TreeFloat) -> Self {
        Self { x, y, z }
    }
}

/// Generated wrappers, one module per stdlib section.
pub mod stdlib {
    pub mod shapes {
        include!(concat!(env!("OUT_DIR"), "/shapes.rs"));
    }
    pub mod csg {
        include!(concat!(env!("OUT_DIR"), "/csg.rs"));
    }
    pub mod transforms {
        include!(concat!(env!("OUT_DIR"), "/transforms.rs"));
    }
    pub mod generators {
        include!(concat!(env!("OUT_DIR"), "/generators.rs"));
    }
    pub mod text {
        include!(concat!(env!("OUT_DIR"), "/text.rs"));
    }
}

/// Recording stand-in for the native stdlib.
#[allow(non_camel_case_types)]
pub mod sys {
    use std::cell::RefCell;
    use std::ffi::{c_char, c_int, CStr};

    pub type libfive_tree = u64;

    #[repr(C)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct tvec2 {
        pub x: libfive_tree,
        pub y: libfive_tree,
    }

    #[repr(C)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct tvec3 {
        pub x: libfive_tree,
        pub y: libfive_tree,
        pub z: libfive_tree,
    }

    /// One marshaled argument as the native side received it.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Arg {
        Tree(libfive_tree),
        Vec2(tvec2),
        Vec3(tvec3),
        Int(c_int),
        Str(String),
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Call {
        pub symbol: &'static str,
        pub args: Vec<Arg>,
        pub result: libfive_tree,
    }

    /// First handle returned by the mock; lower values are free for callers.
    pub const FIRST_RESULT: libfive_tree = 1000;

    thread_local! {
        static CALLS: RefCell<Vec<Call>> = RefCell::new(Vec::new());
    }

    /// Drain the calls recorded on this thread.
    pub fn take_calls() -> Vec<Call> {
        CALLS.with(|calls| std::mem::take(&mut *calls.borrow_mut()))
    }

    fn record(symbol: &'static str, args: Vec<Arg>) -> libfive_tree {
        CALLS.with(|calls| {
            let mut calls = calls.borrow_mut();
            let result = FIRST_RESULT + calls.len() as libfive_tree;
            calls.push(Call { symbol, args, result });
            result
        })
    }

    macro_rules! mock_stdlib {
        ($( $name:ident ( $( $arg:ident : $ty:ty => $variant:ident ),* ); )*) => {
            $(
                pub unsafe fn $name($( $arg: $ty ),*) -> libfive_tree {
                    record(stringify!($name), vec![$( Arg::$variant($arg) ),*])
                }
            )*
        };
    }

    mock_stdlib! {
        libfivestd_circle(r: libfive_tree => Tree, center: tvec2 => Vec2);
        libfivestd_sphere(radius: libfive_tree => Tree, center: tvec3 => Vec3);
        libfivestd_polygon(r: libfive_tree => Tree, n: c_int => Int, center: tvec2 => Vec2);
        libfivestd_emptiness();
        libfivestd_union(a: libfive_tree => Tree, b: libfive_tree => Tree);
        libfivestd_inverse(a: libfive_tree => Tree);
        libfivestd_blend(a: libfive_tree => Tree, b: libfive_tree => Tree, m: libfive_tree => Tree);
        libfivestd_move(t: libfive_tree => Tree, offset: tvec3 => Vec3);
        libfivestd_scale_x(
            t: libfive_tree => Tree,
            sx: libfive_tree => Tree,
            x0: libfive_tree => Tree
        );
        libfivestd_array_x(shape: libfive_tree => Tree, nx: c_int => Int, dx: libfive_tree => Tree);
        libfivestd_extrude_z(
            t: libfive_tree => Tree,
            zmin: libfive_tree => Tree,
            zmax: libfive_tree => Tree
        );
    }

    /// # Safety
    ///
    /// `txt` must point to a NUL-terminated string valid for the call.
    pub unsafe fn libfivestd_text(txt: *const c_char, pos: tvec2) -> libfive_tree {
        let txt = CStr::from_ptr(txt).to_string_lossy().into_owned();
        record("libfivestd_text", vec![Arg::Str(txt), Arg::Vec2(pos)])
    }
}
