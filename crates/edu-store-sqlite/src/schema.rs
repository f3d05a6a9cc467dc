//! SQL schema for the SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`. Column names must match the entity metadata in
//! `edu-core`; a test checks this.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS facilities (
    id          TEXT PRIMARY KEY,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL,
    ten_co_so   TEXT NOT NULL,
    dia_chi     TEXT,
    dien_thoai  TEXT,
    email       TEXT,
    quan_ly_id  TEXT,            -- employee; not a FK to avoid a cycle
    trang_thai  TEXT,
    ghi_chu     TEXT
);

CREATE TABLE IF NOT EXISTS students (
    id             TEXT PRIMARY KEY,
    created_at     TEXT NOT NULL,
    updated_at     TEXT NOT NULL,
    ten_hoc_sinh   TEXT NOT NULL,
    ngay_sinh      TEXT,
    gioi_tinh      TEXT,
    ten_phu_huynh  TEXT,
    sdt_phu_huynh  TEXT,
    email          TEXT,
    dia_chi        TEXT,
    co_so_id       TEXT REFERENCES facilities(id),
    trang_thai     TEXT,
    ghi_chu        TEXT
);

CREATE TABLE IF NOT EXISTS employees (
    id                   TEXT PRIMARY KEY,
    created_at           TEXT NOT NULL,
    updated_at           TEXT NOT NULL,
    ten_nhan_su          TEXT NOT NULL,
    bo_phan              TEXT,
    chuc_vu              TEXT,
    dien_thoai           TEXT,
    email                TEXT,
    ngay_sinh            TEXT,
    co_so_id             TEXT REFERENCES facilities(id),
    tinh_trang_lao_dong  TEXT,
    ghi_chu              TEXT
);

CREATE TABLE IF NOT EXISTS contacts (
    id                TEXT PRIMARY KEY,
    created_at        TEXT NOT NULL,
    updated_at        TEXT NOT NULL,
    ten_lien_he       TEXT NOT NULL,
    loai_lien_he      TEXT,
    dien_thoai        TEXT,
    email             TEXT,
    vi_tri_ung_tuyen  TEXT,
    nguon             TEXT,
    trang_thai        TEXT,
    ghi_chu           TEXT
);

CREATE TABLE IF NOT EXISTS classes (
    id             TEXT PRIMARY KEY,
    created_at     TEXT NOT NULL,
    updated_at     TEXT NOT NULL,
    ten_lop_full   TEXT NOT NULL,
    ten_lop        TEXT,
    chuong_trinh   TEXT,
    co_so_id       TEXT REFERENCES facilities(id),
    gv_chinh_id    TEXT REFERENCES employees(id),
    ngay_bat_dau   TEXT,
    ngay_ket_thuc  TEXT,
    hoc_phi        REAL,
    tinh_trang     TEXT,
    ghi_chu        TEXT
);

CREATE TABLE IF NOT EXISTS enrollments (
    id            TEXT PRIMARY KEY,
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL,
    hoc_sinh_id   TEXT NOT NULL REFERENCES students(id),
    lop_id        TEXT NOT NULL REFERENCES classes(id),
    ngay_dang_ky  TEXT,
    trang_thai    TEXT,
    ghi_chu       TEXT
);

CREATE TABLE IF NOT EXISTS teaching_sessions (
    id            TEXT PRIMARY KEY,
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL,
    lop_id        TEXT NOT NULL REFERENCES classes(id),
    giao_vien_id  TEXT REFERENCES employees(id),
    ngay_hoc      TEXT NOT NULL,
    gio_bat_dau   TEXT,
    gio_ket_thuc  TEXT,
    noi_dung      TEXT,
    ghi_chu       TEXT
);

CREATE TABLE IF NOT EXISTS attendances (
    id           TEXT PRIMARY KEY,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL,
    buoi_hoc_id  TEXT NOT NULL REFERENCES teaching_sessions(id),
    hoc_sinh_id  TEXT NOT NULL REFERENCES students(id),
    trang_thai   TEXT NOT NULL,   -- co_mat | di_muon | vang_co_phep | vang_khong_phep
    ghi_chu      TEXT,
    UNIQUE (buoi_hoc_id, hoc_sinh_id)
);

CREATE TABLE IF NOT EXISTS evaluations (
    id             TEXT PRIMARY KEY,
    created_at     TEXT NOT NULL,
    updated_at     TEXT NOT NULL,
    hoc_sinh_id    TEXT NOT NULL REFERENCES students(id),
    lop_id         TEXT REFERENCES classes(id),
    giao_vien_id   TEXT REFERENCES employees(id),
    ky_danh_gia    TEXT,
    ngay_danh_gia  TEXT,
    diem           REAL,
    nhan_xet       TEXT
);

CREATE TABLE IF NOT EXISTS finances (
    id                    TEXT PRIMARY KEY,
    created_at            TEXT NOT NULL,
    updated_at            TEXT NOT NULL,
    loai_thu_chi          TEXT NOT NULL,   -- thu | chi
    loai_giao_dich        TEXT,
    so_tien               REAL NOT NULL,
    ngay                  TEXT,
    dien_giai             TEXT,
    hoc_sinh_id           TEXT REFERENCES students(id),
    nhan_vien_id          TEXT REFERENCES employees(id),
    co_so_id              TEXT REFERENCES facilities(id),
    hinh_thuc_thanh_toan  TEXT,
    tinh_trang            TEXT
);

CREATE TABLE IF NOT EXISTS payrolls (
    id            TEXT PRIMARY KEY,
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL,
    nhan_vien_id  TEXT NOT NULL REFERENCES employees(id),
    thang         INTEGER NOT NULL,
    nam           INTEGER NOT NULL,
    luong_co_ban  REAL NOT NULL,
    phu_cap       REAL NOT NULL DEFAULT 0,
    thuong        REAL NOT NULL DEFAULT 0,
    khau_tru      REAL NOT NULL DEFAULT 0,
    trang_thai    TEXT,
    ghi_chu       TEXT,
    UNIQUE (nhan_vien_id, thang, nam)
);

CREATE TABLE IF NOT EXISTS assets (
    id            TEXT PRIMARY KEY,
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL,
    ten_tai_san   TEXT NOT NULL,
    loai_tai_san  TEXT,
    so_luong      INTEGER NOT NULL DEFAULT 1,
    don_gia       REAL,
    co_so_id      TEXT REFERENCES facilities(id),
    ngay_mua      TEXT,
    tinh_trang    TEXT,
    ghi_chu       TEXT
);

CREATE TABLE IF NOT EXISTS tasks (
    id                  TEXT PRIMARY KEY,
    created_at          TEXT NOT NULL,
    updated_at          TEXT NOT NULL,
    tieu_de             TEXT NOT NULL,
    mo_ta               TEXT,
    nguoi_phu_trach_id  TEXT REFERENCES employees(id),
    han_hoan_thanh      TEXT,
    muc_do_uu_tien      TEXT,
    trang_thai          TEXT
);

CREATE TABLE IF NOT EXISTS events (
    id             TEXT PRIMARY KEY,
    created_at     TEXT NOT NULL,
    updated_at     TEXT NOT NULL,
    ten_su_kien    TEXT NOT NULL,
    loai_su_kien   TEXT,
    ngay_bat_dau   TEXT,
    ngay_ket_thuc  TEXT,
    dia_diem       TEXT,
    mo_ta          TEXT,
    trang_thai     TEXT
);

CREATE TABLE IF NOT EXISTS requests (
    id                TEXT PRIMARY KEY,
    created_at        TEXT NOT NULL,
    updated_at        TEXT NOT NULL,
    loai_yeu_cau      TEXT NOT NULL,
    nguoi_de_xuat_id  TEXT REFERENCES employees(id),
    noi_dung          TEXT,
    ngay_de_xuat      TEXT,
    nguoi_duyet_id    TEXT REFERENCES employees(id),
    trang_thai        TEXT
);

CREATE TABLE IF NOT EXISTS employee_clock_ins (
    id            TEXT PRIMARY KEY,
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL,
    nhan_vien_id  TEXT NOT NULL REFERENCES employees(id),
    ngay          TEXT NOT NULL,
    gio_vao       TEXT,
    gio_ra        TEXT,
    ghi_chu       TEXT
);

CREATE TABLE IF NOT EXISTS files (
    id            TEXT PRIMARY KEY,
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL,
    ten_file      TEXT NOT NULL,
    loai_file     TEXT,
    duong_dan     TEXT NOT NULL,
    kich_thuoc    INTEGER,
    hoc_sinh_id   TEXT REFERENCES students(id),
    nhan_vien_id  TEXT REFERENCES employees(id),
    lop_id        TEXT REFERENCES classes(id),
    co_so_id      TEXT REFERENCES facilities(id),
    ghi_chu       TEXT
);

CREATE TABLE IF NOT EXISTS settings (
    id          TEXT PRIMARY KEY,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL,
    category    TEXT NOT NULL,
    value       TEXT NOT NULL,
    order_num   INTEGER NOT NULL DEFAULT 0,
    mo_ta       TEXT,
    hoat_dong   INTEGER NOT NULL DEFAULT 1,
    UNIQUE (category, value)
);

CREATE TABLE IF NOT EXISTS sessions (
    id            TEXT PRIMARY KEY,
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL,
    nhan_vien_id  TEXT REFERENCES employees(id),
    token         TEXT NOT NULL UNIQUE,
    het_han       TEXT,
    thong_tin     TEXT            -- JSON
);

CREATE INDEX IF NOT EXISTS enrollments_student_idx  ON enrollments(hoc_sinh_id);
CREATE INDEX IF NOT EXISTS enrollments_class_idx    ON enrollments(lop_id);
CREATE INDEX IF NOT EXISTS sessions_class_idx       ON teaching_sessions(lop_id);
CREATE INDEX IF NOT EXISTS attendances_session_idx  ON attendances(buoi_hoc_id);
CREATE INDEX IF NOT EXISTS finances_date_idx        ON finances(ngay);
CREATE INDEX IF NOT EXISTS clock_ins_employee_idx   ON employee_clock_ins(nhan_vien_id, ngay);
CREATE INDEX IF NOT EXISTS settings_category_idx    ON settings(category, order_num);

PRAGMA user_version = 1;
";
