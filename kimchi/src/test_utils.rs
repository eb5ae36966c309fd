//! Hand-assembled class files and jars for tests
//!
//! Shared by the unit tests and, through `#[path]`, the integration tests, so
//! it only depends on std and the `zip` crate.

#![allow(dead_code)]

use std::io::{Cursor, Write};

type Attribute = (u16, Vec<u8>);

struct MemberSpec {
    access_flags: u16,
    name: u16,
    descriptor: u16,
    attributes: Vec<Attribute>,
}

/// Builds a minimal but well-formed class file (version 52.0).
///
/// Every `utf8` call appends a fresh entry, so tests can choose whether two
/// uses share a slot.
pub struct ClassBuilder {
    pool: Vec<u8>,
    next_index: u16,
    this_class: u16,
    super_class: u16,
    interfaces: Vec<u16>,
    fields: Vec<MemberSpec>,
    methods: Vec<MemberSpec>,
    attributes: Vec<Attribute>,
    code_name: Option<u16>,
}

impl ClassBuilder {
    pub fn new(class_name: &str) -> Self {
        let mut builder = Self {
            pool: Vec::new(),
            next_index: 1,
            this_class: 0,
            super_class: 0,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            attributes: Vec::new(),
            code_name: None,
        };
        let this_name = builder.utf8(class_name);
        builder.this_class = builder.class_ref(this_name);
        let super_name = builder.utf8("java/lang/Object");
        builder.super_class = builder.class_ref(super_name);
        builder
    }

    fn push(&mut self, bytes: &[u8], slots: u16) -> u16 {
        let index = self.next_index;
        self.pool.extend_from_slice(bytes);
        self.next_index += slots;
        index
    }

    /// `text` is written as plain UTF-8; keep it free of NUL and astral chars.
    pub fn utf8(&mut self, text: &str) -> u16 {
        self.utf8_raw(text.as_bytes())
    }

    pub fn utf8_raw(&mut self, payload: &[u8]) -> u16 {
        let mut bytes = vec![1];
        bytes.extend_from_slice(&(payload.len() as u16).to_be_bytes());
        bytes.extend_from_slice(payload);
        self.push(&bytes, 1)
    }

    pub fn string(&mut self, utf8_index: u16) -> u16 {
        self.ref1(8, utf8_index)
    }

    pub fn class_ref(&mut self, name_index: u16) -> u16 {
        self.ref1(7, name_index)
    }

    pub fn method_type(&mut self, descriptor_index: u16) -> u16 {
        self.ref1(16, descriptor_index)
    }

    pub fn name_and_type(&mut self, name_index: u16, descriptor_index: u16) -> u16 {
        self.ref2(12, name_index, descriptor_index)
    }

    pub fn field_ref(&mut self, class_index: u16, name_and_type_index: u16) -> u16 {
        self.ref2(9, class_index, name_and_type_index)
    }

    pub fn method_ref(&mut self, class_index: u16, name_and_type_index: u16) -> u16 {
        self.ref2(10, class_index, name_and_type_index)
    }

    pub fn method_handle(&mut self, kind: u8, reference_index: u16) -> u16 {
        let [hi, lo] = reference_index.to_be_bytes();
        self.push(&[15, kind, hi, lo], 1)
    }

    pub fn integer(&mut self, value: i32) -> u16 {
        let mut bytes = vec![3];
        bytes.extend_from_slice(&value.to_be_bytes());
        self.push(&bytes, 1)
    }

    pub fn float(&mut self, value: f32) -> u16 {
        let mut bytes = vec![4];
        bytes.extend_from_slice(&value.to_bits().to_be_bytes());
        self.push(&bytes, 1)
    }

    pub fn long(&mut self, value: i64) -> u16 {
        let mut bytes = vec![5];
        bytes.extend_from_slice(&value.to_be_bytes());
        self.push(&bytes, 2)
    }

    pub fn double(&mut self, value: f64) -> u16 {
        let mut bytes = vec![6];
        bytes.extend_from_slice(&value.to_bits().to_be_bytes());
        self.push(&bytes, 2)
    }

    /// Appends a raw entry (tag byte included) occupying one slot.
    pub fn raw_entry(&mut self, bytes: &[u8]) -> u16 {
        self.push(bytes, 1)
    }

    fn ref1(&mut self, tag: u8, a: u16) -> u16 {
        let [a0, a1] = a.to_be_bytes();
        self.push(&[tag, a0, a1], 1)
    }

    fn ref2(&mut self, tag: u8, a: u16, b: u16) -> u16 {
        let [a0, a1] = a.to_be_bytes();
        let [b0, b1] = b.to_be_bytes();
        self.push(&[tag, a0, a1, b0, b1], 1)
    }

    pub fn interface(&mut self, class_index: u16) -> &mut Self {
        self.interfaces.push(class_index);
        self
    }

    pub fn field(&mut self, name: u16, descriptor: u16) -> &mut Self {
        self.field_with_attributes(name, descriptor, Vec::new())
    }

    pub fn field_with_attributes(
        &mut self,
        name: u16,
        descriptor: u16,
        attributes: Vec<Attribute>,
    ) -> &mut Self {
        self.fields.push(MemberSpec {
            access_flags: 0x0019, // public static final
            name,
            descriptor,
            attributes,
        });
        self
    }

    /// Adds a `public static` method whose `Code` attribute holds `code`.
    pub fn method_with_code(&mut self, name: u16, descriptor: u16, code: &[u8]) -> &mut Self {
        let code_name = match self.code_name {
            Some(index) => index,
            None => {
                let index = self.utf8("Code");
                self.code_name = Some(index);
                index
            }
        };

        let mut body = Vec::new();
        body.extend_from_slice(&2u16.to_be_bytes()); // max_stack
        body.extend_from_slice(&1u16.to_be_bytes()); // max_locals
        body.extend_from_slice(&(code.len() as u32).to_be_bytes());
        body.extend_from_slice(code);
        body.extend_from_slice(&0u16.to_be_bytes()); // exception_table_length
        body.extend_from_slice(&0u16.to_be_bytes()); // attributes_count

        self.methods.push(MemberSpec {
            access_flags: 0x0009,
            name,
            descriptor,
            attributes: vec![(code_name, body)],
        });
        self
    }

    pub fn class_attribute(&mut self, name: u16, body: Vec<u8>) -> &mut Self {
        self.attributes.push((name, body));
        self
    }

    pub fn code_name_index(&self) -> Option<u16> {
        self.code_name
    }

    pub fn pool_count(&self) -> u16 {
        self.next_index
    }

    pub fn pool_bytes(&self) -> &[u8] {
        &self.pool
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&0xCAFE_BABEu32.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&52u16.to_be_bytes());
        out.extend_from_slice(&self.next_index.to_be_bytes());
        out.extend_from_slice(&self.pool);

        out.extend_from_slice(&0x0021u16.to_be_bytes()); // public super
        out.extend_from_slice(&self.this_class.to_be_bytes());
        out.extend_from_slice(&self.super_class.to_be_bytes());
        out.extend_from_slice(&(self.interfaces.len() as u16).to_be_bytes());
        for interface in &self.interfaces {
            out.extend_from_slice(&interface.to_be_bytes());
        }
        for members in [&self.fields, &self.methods] {
            out.extend_from_slice(&(members.len() as u16).to_be_bytes());
            for member in members {
                out.extend_from_slice(&member.access_flags.to_be_bytes());
                out.extend_from_slice(&member.name.to_be_bytes());
                out.extend_from_slice(&member.descriptor.to_be_bytes());
                write_attributes(&mut out, &member.attributes);
            }
        }
        write_attributes(&mut out, &self.attributes);
        out
    }
}

fn write_attributes(out: &mut Vec<u8>, attributes: &[Attribute]) {
    out.extend_from_slice(&(attributes.len() as u16).to_be_bytes());
    for (name, body) in attributes {
        out.extend_from_slice(&name.to_be_bytes());
        out.extend_from_slice(&(body.len() as u32).to_be_bytes());
        out.extend_from_slice(body);
    }
}

/// A class with one greeting literal loaded by `ldc` in `greet()V`.
///
/// Returns the class bytes and the pool index of the literal's Utf8 entry.
pub fn greeter_class(class_name: &str, greeting: &str) -> (Vec<u8>, u16) {
    let mut builder = ClassBuilder::new(class_name);
    let text = builder.utf8(greeting);
    let string = builder.string(text);
    let name = builder.utf8("greet");
    let descriptor = builder.utf8("()V");
    // ldc #string; pop; return
    builder.method_with_code(name, descriptor, &[0x12, string as u8, 0x57, 0xB1]);
    (builder.build(), text)
}

/// Zips `entries` in order; `.class` entries are deflated, the rest stored.
pub fn build_jar(entries: &[(&str, &[u8])]) -> Vec<u8> {
    use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in entries {
        let method = if name.ends_with(".class") {
            CompressionMethod::Deflated
        } else {
            CompressionMethod::Stored
        };
        let options = SimpleFileOptions::default().compression_method(method);
        writer.start_file(*name, options).unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Entry names and uncompressed contents of a jar, in archive order.
pub fn read_jar(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    use std::io::Read;

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut file = archive.by_index(i).unwrap();
            let mut data = Vec::new();
            file.read_to_end(&mut data).unwrap();
            (file.name().to_owned(), data)
        })
        .collect()
}

/// Stored zip assembled by hand, so names may repeat.
pub fn stored_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    const DOS_DATE: u16 = (1 << 5) | 1; // 1980-01-01

    let mut out = Vec::new();
    let mut central = Vec::new();
    for (name, data) in entries {
        let offset = out.len() as u32;
        let crc = crc32(data);
        let mut common = Vec::new();
        common.extend_from_slice(&20u16.to_le_bytes()); // version needed
        common.extend_from_slice(&0u16.to_le_bytes()); // flags
        common.extend_from_slice(&0u16.to_le_bytes()); // stored
        common.extend_from_slice(&0u16.to_le_bytes()); // time
        common.extend_from_slice(&DOS_DATE.to_le_bytes());
        common.extend_from_slice(&crc.to_le_bytes());
        common.extend_from_slice(&(data.len() as u32).to_le_bytes());
        common.extend_from_slice(&(data.len() as u32).to_le_bytes());
        common.extend_from_slice(&(name.len() as u16).to_le_bytes());
        common.extend_from_slice(&0u16.to_le_bytes()); // extra length

        out.extend_from_slice(&0x0403_4B50u32.to_le_bytes());
        out.extend_from_slice(&common);
        out.extend_from_slice(name.as_bytes());
        out.extend_from_slice(data);

        central.extend_from_slice(&0x0201_4B50u32.to_le_bytes());
        central.extend_from_slice(&20u16.to_le_bytes()); // version made by
        central.extend_from_slice(&common);
        central.extend_from_slice(&0u16.to_le_bytes()); // comment length
        central.extend_from_slice(&0u16.to_le_bytes()); // disk
        central.extend_from_slice(&0u16.to_le_bytes()); // internal attributes
        central.extend_from_slice(&0u32.to_le_bytes()); // external attributes
        central.extend_from_slice(&offset.to_le_bytes());
        central.extend_from_slice(name.as_bytes());
    }

    let central_offset = out.len() as u32;
    out.extend_from_slice(&central);
    out.extend_from_slice(&0x0605_4B50u32.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    out.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    out.extend_from_slice(&(central.len() as u32).to_le_bytes());
    out.extend_from_slice(&central_offset.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out
}

fn crc32(data: &[u8]) -> u32 {
    let mut crc = !0u32;
    for byte in data {
        crc ^= u32::from(*byte);
        for _ in 0..8 {
            let mask = (crc & 1).wrapping_neg();
            crc = (crc >> 1) ^ (0xEDB8_8320 & mask);
        }
    }
    !crc
}

/// Flips eight bytes in the middle of an entry's compressed data.
pub fn corrupt_entry_data(jar: &mut [u8], name: &str) {
    let (start, len) = {
        let mut archive = zip::ZipArchive::new(Cursor::new(&*jar)).unwrap();
        let file = archive.by_name(name).unwrap();
        (file.data_start() as usize, file.compressed_size() as usize)
    };
    assert!(len >= 16, "{name} is too small to corrupt");
    let from = start + len / 2 - 4;
    for byte in &mut jar[from..from + 8] {
        *byte ^= 0xFF;
    }
}
