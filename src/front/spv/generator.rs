/*! Registered generator tool IDs.

Mirrors the generator section of the Khronos SPIR-V registry. The upper
16 bits of the second header word select an entry; unregistered IDs are
reported as vendor `"unknown"` without a tool name.
!*/

pub const UNKNOWN_VENDOR: &str = "unknown";

const GENERATORS: &[(u16, &str, Option<&str>)] = &[
    (0, "Khronos", None),
    (1, "LunarG", None),
    (2, "Valve", None),
    (3, "Codeplay", None),
    (4, "NVIDIA", None),
    (5, "ARM", None),
    (6, "Khronos", Some("LLVM/SPIR-V Translator")),
    (7, "Khronos", Some("SPIR-V Tools Assembler")),
    (8, "Khronos", Some("Glslang Reference Front End")),
    (9, "Qualcomm", None),
    (10, "AMD", None),
    (11, "Intel", None),
    (12, "Imagination", None),
    (13, "Google", Some("Shaderc over Glslang")),
    (14, "Google", Some("spiregg")),
    (15, "Google", Some("rspirv")),
    (16, "X-LEGEND", Some("Mesa-IR/SPIR-V Translator")),
    (17, "Khronos", Some("SPIR-V Tools Linker")),
    (18, "Wine", Some("VKD3D Shader Compiler")),
    (19, "Tellusim", Some("Clay Shader Compiler")),
    (20, "W3C WebGPU Group", Some("WHLSL Shader Translator")),
    (21, "Google", Some("Clspv")),
    (22, "Google", Some("MLIR SPIR-V Serializer")),
    (23, "Google", Some("Tint Compiler")),
    (24, "Google", Some("ANGLE Shader Compiler")),
    (25, "Netease Games", Some("Messiah Shader Compiler")),
    (26, "Xenia", Some("Xenia Emulator Microcode Translator")),
    (27, "Embark Studios", Some("Rust GPU Compiler Backend")),
    (28, "gfx-rs community", Some("Naga")),
    (29, "Mikkosoft Productions", Some("MSP Shader Compiler")),
    (30, "SpvGenTwo community", Some("SpvGenTwo SPIR-V IR Tools")),
    (31, "Google", Some("Skia SkSL")),
    (32, "TornadoVM", Some("Beehive SPIRV Toolkit")),
    (33, "DragonJoker", Some("ShaderWriter")),
    (34, "Rayan Hatout", Some("SPIRVSmith")),
    (35, "Saarland University", Some("Shady")),
    (36, "Taichi Graphics", Some("Taichi")),
];

/// Returns the vendor and tool name registered for `tool_id`.
pub fn lookup(tool_id: u16) -> (&'static str, Option<&'static str>) {
    GENERATORS
        .iter()
        .find(|&&(id, _, _)| id == tool_id)
        .map_or((UNKNOWN_VENDOR, None), |&(_, vendor, tool)| (vendor, tool))
}

impl crate::Generator {
    /// Split a raw generator word and look up its registry entry.
    pub fn from_word(word: crate::Word) -> Self {
        let tool_id = (word >> 16) as u16;
        let (vendor, tool) = lookup(tool_id);
        crate::Generator {
            tool_id,
            version: (word & 0xffff) as u16,
            vendor: vendor.to_string(),
            tool: tool.map(str::to_string),
        }
    }

    /// The raw generator word this value was decoded from.
    pub fn to_word(&self) -> crate::Word {
        (crate::Word::from(self.tool_id) << 16) | crate::Word::from(self.version)
    }
}
